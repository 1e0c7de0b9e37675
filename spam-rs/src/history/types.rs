//! Scan history types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::spam::ClassificationResult;

/// A persisted single-message scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(flatten)]
    pub result: ClassificationResult,
}

impl ScanRecord {
    pub fn new(user_id: &str, message: &str, result: ClassificationResult) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            timestamp: Utc::now(),
            message: message.to_string(),
            result,
        }
    }
}

/// Per-user scan counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub total_scans: usize,
    pub spam_detected: usize,
    /// Timestamp of the newest scan, `None` before the first one
    pub last_scan: Option<DateTime<Utc>>,
}

impl UserStats {
    /// Tally scans ordered newest first
    pub fn from_scans(scans: &[ScanRecord]) -> Self {
        Self {
            total_scans: scans.len(),
            spam_detected: scans.iter().filter(|s| s.result.is_spam()).count(),
            last_scan: scans.first().map(|s| s.timestamp),
        }
    }
}

/// Retention caps applied on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention {
    pub scans: usize,
    pub reports: usize,
}

impl Default for Retention {
    fn default() -> Self {
        Self {
            scans: 50,
            reports: 10,
        }
    }
}

impl From<&crate::config::HistoryConfig> for Retention {
    fn from(config: &crate::config::HistoryConfig) -> Self {
        Self {
            scans: config.scan_retention,
            reports: config.report_retention,
        }
    }
}
