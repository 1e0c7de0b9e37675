//! Batch analysis
//!
//! Splits uploads into messages, scores them in parallel and aggregates the
//! results into a report.

pub mod analyzer;
pub mod parser;
pub mod types;

pub use analyzer::{preview, BatchAnalyzer};
pub use parser::parse_messages;
pub use types::*;
