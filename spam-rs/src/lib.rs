//! spam-rs: Lexical spam scoring service
//!
//! Scores free-text messages against weighted keyword and phrase lexicons
//! and explains every verdict with a ranked list of influential terms.
//!
//! # Features
//!
//! - **Scoring**: Deterministic, whole-word keyword and phrase matching
//!   plus caps/exclamation/URL heuristics
//! - **Batch reports**: CSV or plain text uploads scored in parallel
//! - **History**: Recent scans and reports per user, in memory or SQLite
//! - **Export**: Scans and reports as CSV
//!
//! # Example
//!
//! ```no_run
//! use spam_rs::api::ApiServer;
//! use spam_rs::config::Config;
//! use spam_rs::service::AnalysisService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let service = AnalysisService::from_config(&config).await?;
//!
//!     let server = ApiServer::new(service, config.server.listen_addr.clone());
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`spam`]: Lexicons and the scorer
//! - [`batch`]: Upload parsing and batch aggregation
//! - [`history`]: Scan/report stores and CSV export
//! - [`service`]: Orchestration used by the API and CLI
//! - [`api`]: HTTP endpoints

pub mod api;
pub mod batch;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod service;
pub mod spam;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SpamError};
pub use service::{AnalysisEvent, AnalysisService};
pub use spam::{score, ClassificationResult, LexicalScorer, Prediction, WordInfluence};
