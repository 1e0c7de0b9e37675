//! Spam scoring module
//!
//! Deterministic keyword-weighted classification with a ranked
//! word-influence explanation.

pub mod lexicon;
pub mod scorer;
pub mod types;

pub use lexicon::{Lexicons, WordStats, WordWeight};
pub use scorer::{score, LexicalScorer};
pub use types::*;
