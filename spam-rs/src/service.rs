//! Analysis service
//!
//! Ties the scorer, batch analysis and history store together. Results are
//! returned to the caller; an optional channel receives a copy of each
//! completion event for whoever attached it.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::batch::{parse_messages, BatchAnalyzer, BatchReport, BatchSummary, UploadFormat};
use crate::config::{Config, StorageBackend};
use crate::error::{Result, SpamError};
use crate::history::{
    report_to_csv, scan_to_csv, MemoryScanStore, Retention, ScanRecord, ScanStore, SqliteScanStore,
    UserStats,
};
use crate::spam::{ClassificationResult, LexicalScorer, Lexicons, Prediction, WordStats};

/// Completion notice forwarded to an attached channel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisEvent {
    ScanCompleted {
        user_id: String,
        scan_id: String,
        prediction: Prediction,
        confidence: f64,
    },
    BatchCompleted {
        user_id: String,
        batch_id: String,
        summary: BatchSummary,
    },
}

/// Scores for an ad-hoc list of messages, not persisted
#[derive(Debug, Clone, Serialize)]
pub struct PredictionSet {
    pub predictions: Vec<ClassificationResult>,
    pub summary: BatchSummary,
}

pub struct AnalysisService {
    scorer: Arc<LexicalScorer>,
    batch: BatchAnalyzer,
    store: Arc<dyn ScanStore>,
    retention: Retention,
    events: Option<UnboundedSender<AnalysisEvent>>,
}

impl AnalysisService {
    pub fn new(
        scorer: Arc<LexicalScorer>,
        store: Arc<dyn ScanStore>,
        config: &Config,
    ) -> Self {
        Self {
            batch: BatchAnalyzer::new(Arc::clone(&scorer), &config.batch),
            scorer,
            store,
            retention: Retention::from(&config.history),
            events: None,
        }
    }

    /// Build the scorer and the configured store
    pub async fn from_config(config: &Config) -> Result<Self> {
        let scorer = match &config.scoring.lexicon_path {
            Some(path) => {
                info!("Loading lexicons from {}", path);
                LexicalScorer::with_lexicons(Lexicons::from_file(path)?)?
            }
            None => LexicalScorer::new(),
        };

        let retention = Retention::from(&config.history);
        let store: Arc<dyn ScanStore> = match config.storage.backend {
            StorageBackend::Memory => {
                info!("Using in-memory history store");
                Arc::new(MemoryScanStore::new(retention))
            }
            StorageBackend::Sqlite => {
                info!("Using SQLite history store at {}", config.storage.database_url);
                Arc::new(SqliteScanStore::connect(&config.storage.database_url, retention).await?)
            }
        };

        Ok(Self::new(Arc::new(scorer), store, config))
    }

    /// Forward completion events to `sender`
    pub fn with_events(mut self, sender: UnboundedSender<AnalysisEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Score and persist a single message
    pub async fn analyze(&self, user_id: &str, text: &str) -> Result<ScanRecord> {
        if text.trim().is_empty() {
            return Err(SpamError::InvalidInput("message is empty".to_string()));
        }

        let record = ScanRecord::new(user_id, text, self.scorer.score(text));
        self.store.push_scan(record.clone()).await?;

        debug!(
            "Scan {} for {}: {} ({:.2})",
            record.id, user_id, record.result.prediction, record.result.confidence
        );

        self.notify(AnalysisEvent::ScanCompleted {
            user_id: user_id.to_string(),
            scan_id: record.id.clone(),
            prediction: record.result.prediction,
            confidence: record.result.confidence,
        });

        Ok(record)
    }

    /// Score a list of messages without storing anything
    pub async fn predict(&self, messages: Vec<String>) -> Result<PredictionSet> {
        if messages.is_empty() {
            return Err(SpamError::InvalidInput("no messages provided".to_string()));
        }

        let predictions = self.batch.score_all(messages).await?;
        let summary = BatchSummary::from_results(&predictions);
        Ok(PredictionSet { predictions, summary })
    }

    /// Split an uploaded file, score every message and store the report
    pub async fn analyze_upload(
        &self,
        user_id: &str,
        file_name: &str,
        content: &str,
    ) -> Result<BatchReport> {
        let format = UploadFormat::from_file_name(file_name)?;
        let messages = parse_messages(content, format)?;
        info!("Extracted {} messages from {}", messages.len(), file_name);

        let report = self.batch.analyze(user_id, messages).await?;
        self.store.push_report(report.clone()).await?;

        self.notify(AnalysisEvent::BatchCompleted {
            user_id: user_id.to_string(),
            batch_id: report.id.clone(),
            summary: report.summary.clone(),
        });

        Ok(report)
    }

    pub async fn recent_scans(&self, user_id: &str) -> Result<Vec<ScanRecord>> {
        self.store.recent_scans(user_id, self.retention.scans).await
    }

    pub async fn get_scan(&self, user_id: &str, id: &str) -> Result<ScanRecord> {
        self.store
            .get_scan(user_id, id)
            .await?
            .ok_or_else(|| SpamError::NotFound(format!("scan {}", id)))
    }

    pub async fn recent_reports(&self, user_id: &str) -> Result<Vec<BatchReport>> {
        self.store.recent_reports(user_id, self.retention.reports).await
    }

    pub async fn get_report(&self, user_id: &str, id: &str) -> Result<BatchReport> {
        self.store
            .get_report(user_id, id)
            .await?
            .ok_or_else(|| SpamError::NotFound(format!("report {}", id)))
    }

    pub async fn export_scan(&self, user_id: &str, id: &str) -> Result<String> {
        scan_to_csv(&self.get_scan(user_id, id).await?)
    }

    pub async fn export_report(&self, user_id: &str, id: &str) -> Result<String> {
        report_to_csv(&self.get_report(user_id, id).await?)
    }

    /// Scan counters over the retained history
    pub async fn user_stats(&self, user_id: &str) -> Result<UserStats> {
        let scans = self.store.recent_scans(user_id, self.retention.scans).await?;
        Ok(UserStats::from_scans(&scans))
    }

    /// Weighted terms the scorer is running with
    pub fn word_stats(&self) -> WordStats {
        self.scorer.lexicons().word_stats()
    }

    pub async fn clear_history(&self, user_id: &str) -> Result<()> {
        info!("Clearing history for {}", user_id);
        self.store.clear_history(user_id).await
    }

    fn notify(&self, event: AnalysisEvent) {
        if let Some(sender) = &self.events {
            if sender.send(event).is_err() {
                debug!("Event receiver dropped");
            }
        }
    }
}
