use crate::error::{Result, SpamError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// `memory` or `sqlite`
    pub backend: StorageBackend,
    pub database_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

/// Per-user retention caps for stored history
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    #[serde(default = "default_scan_retention")]
    pub scan_retention: usize,
    #[serde(default = "default_report_retention")]
    pub report_retention: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Maximum number of messages scored concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Characters kept in a batch item's message preview
    #[serde(default = "default_preview_len")]
    pub preview_len: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScoringConfig {
    /// Optional TOML file replacing the built-in lexicons
    pub lexicon_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_scan_retention() -> usize {
    50
}

fn default_report_retention() -> usize {
    10
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_preview_len() -> usize {
    100
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            scan_retention: default_scan_retention(),
            report_retention: default_report_retention(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            preview_len: default_preview_len(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SpamError::Config(e.to_string()))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| SpamError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.batch.workers == 0 {
            return Err(SpamError::Config("batch.workers must be at least 1".to_string()));
        }
        if self.history.scan_retention == 0 || self.history.report_retention == 0 {
            return Err(SpamError::Config(
                "history retention caps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn default() -> Self {
        Self {
            server: ServerConfig {
                listen_addr: "0.0.0.0:5001".to_string(),
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                database_url: "sqlite://spam.db".to_string(),
            },
            history: HistoryConfig::default(),
            batch: BatchConfig::default(),
            scoring: ScoringConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
