//! SQLite-backed history store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::debug;

use super::store::ScanStore;
use super::types::{Retention, ScanRecord};
use crate::batch::{BatchItem, BatchReport, BatchSummary};
use crate::error::Result;
use crate::spam::{ClassificationResult, WordInfluence};

type ScanRow = (String, String, String, String, String, f64, String);
type ReportRow = (String, String, String, i64, i64, i64, f64, String);

/// History store persisted in SQLite
pub struct SqliteScanStore {
    db: SqlitePool,
    retention: Retention,
}

impl SqliteScanStore {
    pub fn new(db: SqlitePool, retention: Retention) -> Self {
        Self { db, retention }
    }

    /// Connect to `database_url` and create the tables
    ///
    /// The database file is created when missing. In-memory databases live
    /// per connection, so they get a single connection that is never recycled.
    pub async fn connect(database_url: &str, retention: Retention) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };
        let db = pool_options.connect_with(options).await?;
        let store = Self::new(db, retention);
        store.init_db().await?;
        Ok(store)
    }

    /// Initialize database tables
    pub async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS scans (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                message TEXT NOT NULL,
                prediction TEXT NOT NULL,
                confidence REAL NOT NULL,
                word_influence TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS batch_reports (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                total INTEGER NOT NULL,
                spam_count INTEGER NOT NULL,
                ham_count INTEGER NOT NULL,
                spam_percentage REAL NOT NULL,
                results TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_scans_user ON scans (user_id, seq)")
            .execute(&self.db)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_reports_user ON batch_reports (user_id, seq)")
            .execute(&self.db)
            .await?;

        Ok(())
    }

    fn scan_from_row(row: ScanRow) -> Result<ScanRecord> {
        let (id, user_id, created_at, message, prediction, confidence, word_influence) = row;
        let word_influence: Vec<WordInfluence> = serde_json::from_str(&word_influence)?;

        Ok(ScanRecord {
            id,
            user_id,
            timestamp: parse_timestamp(&created_at),
            message,
            result: ClassificationResult {
                prediction: prediction.parse()?,
                confidence,
                word_influence,
            },
        })
    }

    fn report_from_row(row: ReportRow) -> Result<BatchReport> {
        let (id, user_id, created_at, total, spam_count, ham_count, spam_percentage, results) = row;
        let results: Vec<BatchItem> = serde_json::from_str(&results)?;

        Ok(BatchReport {
            id,
            user_id,
            timestamp: parse_timestamp(&created_at),
            summary: BatchSummary {
                total: total as usize,
                spam_count: spam_count as usize,
                ham_count: ham_count as usize,
                spam_percentage,
            },
            results,
        })
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl ScanStore for SqliteScanStore {
    async fn push_scan(&self, record: ScanRecord) -> Result<()> {
        let word_influence = serde_json::to_string(&record.result.word_influence)?;

        sqlx::query(
            "INSERT INTO scans (id, user_id, created_at, message, prediction, confidence, word_influence) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(record.timestamp.to_rfc3339())
        .bind(&record.message)
        .bind(record.result.prediction.as_str())
        .bind(record.result.confidence)
        .bind(&word_influence)
        .execute(&self.db)
        .await?;

        let pruned = sqlx::query(
            r#"
            DELETE FROM scans WHERE user_id = ? AND seq NOT IN (
                SELECT seq FROM scans WHERE user_id = ? ORDER BY seq DESC LIMIT ?
            )
            "#,
        )
        .bind(&record.user_id)
        .bind(&record.user_id)
        .bind(self.retention.scans as i64)
        .execute(&self.db)
        .await?;

        if pruned.rows_affected() > 0 {
            debug!("Pruned {} old scans for {}", pruned.rows_affected(), record.user_id);
        }

        Ok(())
    }

    async fn recent_scans(&self, user_id: &str, limit: usize) -> Result<Vec<ScanRecord>> {
        let rows = sqlx::query_as::<_, ScanRow>(
            "SELECT id, user_id, created_at, message, prediction, confidence, word_influence FROM scans WHERE user_id = ? ORDER BY seq DESC LIMIT ?"
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Self::scan_from_row).collect()
    }

    async fn get_scan(&self, user_id: &str, id: &str) -> Result<Option<ScanRecord>> {
        let row = sqlx::query_as::<_, ScanRow>(
            "SELECT id, user_id, created_at, message, prediction, confidence, word_influence FROM scans WHERE user_id = ? AND id = ?"
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(Self::scan_from_row).transpose()
    }

    async fn push_report(&self, report: BatchReport) -> Result<()> {
        let results = serde_json::to_string(&report.results)?;

        sqlx::query(
            "INSERT INTO batch_reports (id, user_id, created_at, total, spam_count, ham_count, spam_percentage, results) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&report.id)
        .bind(&report.user_id)
        .bind(report.timestamp.to_rfc3339())
        .bind(report.summary.total as i64)
        .bind(report.summary.spam_count as i64)
        .bind(report.summary.ham_count as i64)
        .bind(report.summary.spam_percentage)
        .bind(&results)
        .execute(&self.db)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM batch_reports WHERE user_id = ? AND seq NOT IN (
                SELECT seq FROM batch_reports WHERE user_id = ? ORDER BY seq DESC LIMIT ?
            )
            "#,
        )
        .bind(&report.user_id)
        .bind(&report.user_id)
        .bind(self.retention.reports as i64)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn recent_reports(&self, user_id: &str, limit: usize) -> Result<Vec<BatchReport>> {
        let rows = sqlx::query_as::<_, ReportRow>(
            "SELECT id, user_id, created_at, total, spam_count, ham_count, spam_percentage, results FROM batch_reports WHERE user_id = ? ORDER BY seq DESC LIMIT ?"
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Self::report_from_row).collect()
    }

    async fn get_report(&self, user_id: &str, id: &str) -> Result<Option<BatchReport>> {
        let row = sqlx::query_as::<_, ReportRow>(
            "SELECT id, user_id, created_at, total, spam_count, ham_count, spam_percentage, results FROM batch_reports WHERE user_id = ? AND id = ?"
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(Self::report_from_row).transpose()
    }

    async fn clear_history(&self, user_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM scans WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        sqlx::query("DELETE FROM batch_reports WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
