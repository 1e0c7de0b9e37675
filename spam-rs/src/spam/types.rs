//! Spam types and data structures

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::SpamError;

/// Classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prediction {
    Spam,
    Ham,
}

impl Prediction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prediction::Spam => "spam",
            Prediction::Ham => "ham",
        }
    }

    pub fn is_spam(&self) -> bool {
        matches!(self, Prediction::Spam)
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Prediction {
    type Err = SpamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spam" => Ok(Prediction::Spam),
            "ham" => Ok(Prediction::Ham),
            other => Err(SpamError::InvalidInput(format!("unknown prediction: {}", other))),
        }
    }
}

/// A weighted lexicon term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub term: Cow<'static, str>,
    /// Contribution per occurrence, in (0, 1]
    pub weight: f64,
}

impl LexiconEntry {
    pub const fn new(term: &'static str, weight: f64) -> Self {
        Self {
            term: Cow::Borrowed(term),
            weight,
        }
    }

    pub fn owned(term: impl Into<String>, weight: f64) -> Self {
        Self {
            term: Cow::Owned(term.into()),
            weight,
        }
    }
}

/// Signed contribution of one matched term or heuristic.
///
/// Positive values lean spam, negative values lean ham.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordInfluence {
    #[serde(rename = "word")]
    pub term: String,
    pub influence: f64,
}

impl WordInfluence {
    pub fn new(term: impl Into<String>, influence: f64) -> Self {
        Self {
            term: term.into(),
            influence,
        }
    }
}

/// Scoring result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub prediction: Prediction,
    /// Confidence in [0.5, 0.98]
    pub confidence: f64,
    /// Sorted by descending absolute influence
    pub word_influence: Vec<WordInfluence>,
}

impl ClassificationResult {
    /// Result returned when nothing in the text carries a signal
    pub fn neutral() -> Self {
        Self {
            prediction: Prediction::Ham,
            confidence: 0.5,
            word_influence: Vec::new(),
        }
    }

    pub fn is_spam(&self) -> bool {
        self.prediction.is_spam()
    }

    /// Confidence as a percentage rounded to two decimals
    pub fn confidence_percent(&self) -> f64 {
        round2(self.confidence * 100.0)
    }

    pub fn top_words(&self, n: usize) -> &[WordInfluence] {
        &self.word_influence[..n.min(self.word_influence.len())]
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
