//! Parallel batch scoring

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::types::{BatchItem, BatchReport, BatchSummary};
use crate::config::BatchConfig;
use crate::error::{Result, SpamError};
use crate::spam::{ClassificationResult, LexicalScorer};

/// Scores collections of messages on blocking worker tasks
#[derive(Debug, Clone)]
pub struct BatchAnalyzer {
    scorer: Arc<LexicalScorer>,
    workers: usize,
    preview_len: usize,
}

impl BatchAnalyzer {
    pub fn new(scorer: Arc<LexicalScorer>, config: &BatchConfig) -> Self {
        Self {
            scorer,
            workers: config.workers.max(1),
            preview_len: config.preview_len,
        }
    }

    /// Score every message, keeping input order.
    ///
    /// Messages are split into at most `workers` contiguous chunks, each
    /// scored on its own blocking task.
    pub async fn score_all(&self, messages: Vec<String>) -> Result<Vec<ClassificationResult>> {
        if messages.is_empty() {
            return Ok(Vec::new());
        }

        let messages: Arc<[String]> = messages.into();
        let chunk_size = messages.len().div_ceil(self.workers);
        debug!(
            "Scoring {} messages in chunks of {}",
            messages.len(),
            chunk_size
        );

        let mut handles = Vec::with_capacity(self.workers);
        for start in (0..messages.len()).step_by(chunk_size) {
            let end = (start + chunk_size).min(messages.len());
            let messages = Arc::clone(&messages);
            let scorer = Arc::clone(&self.scorer);
            handles.push(tokio::task::spawn_blocking(move || {
                messages[start..end]
                    .iter()
                    .map(|m| scorer.score(m))
                    .collect::<Vec<_>>()
            }));
        }

        let mut results = Vec::with_capacity(messages.len());
        for handle in handles {
            results.extend(handle.await?);
        }

        Ok(results)
    }

    /// Score a batch and aggregate it into a report
    pub async fn analyze(&self, user_id: &str, messages: Vec<String>) -> Result<BatchReport> {
        if messages.is_empty() {
            return Err(SpamError::InvalidInput("no valid messages found".to_string()));
        }

        let results = self.score_all(messages.clone()).await?;
        let summary = BatchSummary::from_results(&results);

        let items: Vec<BatchItem> = messages
            .into_iter()
            .zip(results)
            .map(|(full_message, result)| BatchItem {
                id: Uuid::new_v4().to_string(),
                message: preview(&full_message, self.preview_len),
                full_message,
                result,
            })
            .collect();

        let report = BatchReport {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            timestamp: Utc::now(),
            summary,
            results: items,
        };

        info!(
            "Batch {} analyzed: {} messages, {} spam, {} ham",
            report.id, report.summary.total, report.summary.spam_count, report.summary.ham_count
        );

        Ok(report)
    }
}

/// First `max_chars` characters, with `...` appended when truncated
pub fn preview(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}
