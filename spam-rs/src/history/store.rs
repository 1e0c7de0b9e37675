//! Storage interface for scan history and batch reports

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::types::{Retention, ScanRecord};
use crate::batch::BatchReport;
use crate::error::Result;

/// Per-user, most-recent-first history storage.
///
/// Inserts prepend and then drop whatever falls past the retention cap.
#[async_trait]
pub trait ScanStore: Send + Sync {
    async fn push_scan(&self, record: ScanRecord) -> Result<()>;

    async fn recent_scans(&self, user_id: &str, limit: usize) -> Result<Vec<ScanRecord>>;

    async fn get_scan(&self, user_id: &str, id: &str) -> Result<Option<ScanRecord>>;

    async fn push_report(&self, report: BatchReport) -> Result<()>;

    async fn recent_reports(&self, user_id: &str, limit: usize) -> Result<Vec<BatchReport>>;

    async fn get_report(&self, user_id: &str, id: &str) -> Result<Option<BatchReport>>;

    /// Remove all scans and reports of a user
    async fn clear_history(&self, user_id: &str) -> Result<()>;
}

#[derive(Debug, Default)]
struct UserHistory {
    scans: Vec<ScanRecord>,
    reports: Vec<BatchReport>,
}

/// In-memory store, lost on restart
#[derive(Debug)]
pub struct MemoryScanStore {
    retention: Retention,
    users: RwLock<HashMap<String, UserHistory>>,
}

impl MemoryScanStore {
    pub fn new(retention: Retention) -> Self {
        Self {
            retention,
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Number of users with any history
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Default for MemoryScanStore {
    fn default() -> Self {
        Self::new(Retention::default())
    }
}

#[async_trait]
impl ScanStore for MemoryScanStore {
    async fn push_scan(&self, record: ScanRecord) -> Result<()> {
        let mut users = self.users.write().await;
        let history = users.entry(record.user_id.clone()).or_default();
        history.scans.insert(0, record);
        history.scans.truncate(self.retention.scans);
        Ok(())
    }

    async fn recent_scans(&self, user_id: &str, limit: usize) -> Result<Vec<ScanRecord>> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .map(|h| h.scans.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn get_scan(&self, user_id: &str, id: &str) -> Result<Option<ScanRecord>> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .and_then(|h| h.scans.iter().find(|s| s.id == id).cloned()))
    }

    async fn push_report(&self, report: BatchReport) -> Result<()> {
        let mut users = self.users.write().await;
        let history = users.entry(report.user_id.clone()).or_default();
        history.reports.insert(0, report);
        history.reports.truncate(self.retention.reports);
        Ok(())
    }

    async fn recent_reports(&self, user_id: &str, limit: usize) -> Result<Vec<BatchReport>> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .map(|h| h.reports.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn get_report(&self, user_id: &str, id: &str) -> Result<Option<BatchReport>> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .and_then(|h| h.reports.iter().find(|r| r.id == id).cloned()))
    }

    async fn clear_history(&self, user_id: &str) -> Result<()> {
        self.users.write().await.remove(user_id);
        Ok(())
    }
}
