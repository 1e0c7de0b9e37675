//! Batch report types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SpamError};
use crate::spam::types::round2;
use crate::spam::ClassificationResult;

/// How an uploaded file is split into messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    /// One message per row, column picked from the header
    Csv,
    /// One message per non-blank line
    Text,
}

impl UploadFormat {
    /// Pick the format from an upload's file name (`.csv` or `.txt`)
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(UploadFormat::Csv),
            Some("txt") => Ok(UploadFormat::Text),
            _ => Err(SpamError::UnsupportedFile(format!(
                "{} (expected .csv or .txt)",
                file_name
            ))),
        }
    }
}

/// One scored message of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub id: String,
    /// Truncated message used for listings
    pub message: String,
    pub full_message: String,
    #[serde(flatten)]
    pub result: ClassificationResult,
}

/// Aggregate counts over a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub spam_count: usize,
    pub ham_count: usize,
    /// Share of spam in percent, two decimals
    pub spam_percentage: f64,
}

impl BatchSummary {
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ClassificationResult>,
    {
        let mut spam_count = 0;
        let mut ham_count = 0;
        for result in results {
            if result.is_spam() {
                spam_count += 1;
            } else {
                ham_count += 1;
            }
        }

        let total = spam_count + ham_count;
        let spam_percentage = if total > 0 {
            round2(spam_count as f64 / total as f64 * 100.0)
        } else {
            0.0
        };

        Self {
            total,
            spam_count,
            ham_count,
            spam_percentage,
        }
    }
}

/// A completed batch analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub summary: BatchSummary,
    pub results: Vec<BatchItem>,
}
