//! Scan history and batch report persistence
//!
//! Storage is injected through the [`ScanStore`] trait so the scorer stays
//! independent of where results end up.

pub mod export;
pub mod sqlite;
pub mod store;
pub mod types;

pub use export::{report_to_csv, scan_to_csv};
pub use sqlite::SqliteScanStore;
pub use store::{MemoryScanStore, ScanStore};
pub use types::{Retention, ScanRecord, UserStats};
