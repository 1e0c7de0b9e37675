//! Weighted lexicons used by the scorer
//!
//! The built-in tables are static. A replacement set can be loaded from a
//! TOML file of the form:
//!
//! ```toml
//! phrases = ["click here", "act now"]
//!
//! [[spam]]
//! term = "free"
//! weight = 0.7
//!
//! [[ham]]
//! term = "meeting"
//! weight = 0.6
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

use super::types::LexiconEntry;
use crate::error::{Result, SpamError};

/// Flat weight added once for any phrase present in the text
pub const PHRASE_WEIGHT: f64 = 0.8;

pub const SPAM_KEYWORDS: &[LexiconEntry] = &[
    LexiconEntry::new("free", 0.7),
    LexiconEntry::new("winner", 0.8),
    LexiconEntry::new("congratulations", 0.6),
    LexiconEntry::new("prize", 0.7),
    LexiconEntry::new("money", 0.5),
    LexiconEntry::new("offer", 0.5),
    LexiconEntry::new("limited", 0.5),
    LexiconEntry::new("urgent", 0.6),
    LexiconEntry::new("viagra", 0.9),
    LexiconEntry::new("click", 0.5),
    LexiconEntry::new("cash", 0.6),
    LexiconEntry::new("guarantee", 0.5),
    LexiconEntry::new("credit", 0.4),
    LexiconEntry::new("investment", 0.4),
    LexiconEntry::new("million", 0.7),
    LexiconEntry::new("discount", 0.5),
    LexiconEntry::new("save", 0.4),
    LexiconEntry::new("buy", 0.3),
    LexiconEntry::new("subscribe", 0.3),
    LexiconEntry::new("casino", 0.8),
    LexiconEntry::new("lottery", 0.8),
    LexiconEntry::new("bonus", 0.6),
    LexiconEntry::new("promotion", 0.5),
    LexiconEntry::new("pills", 0.8),
    LexiconEntry::new("medication", 0.7),
    LexiconEntry::new("pharmacy", 0.7),
    LexiconEntry::new("debt", 0.6),
    LexiconEntry::new("loan", 0.5),
    LexiconEntry::new("bitcoin", 0.6),
    LexiconEntry::new("crypto", 0.6),
];

pub const SPAM_PHRASES: &[&str] = &[
    "act now",
    "limited time",
    "don't miss",
    "click here",
    "risk free",
    "satisfaction guaranteed",
    "no obligation",
    "no risk",
    "100% free",
    "best price",
    "cash bonus",
    "double your",
    "earn extra",
    "extra cash",
    "free access",
    "free consultation",
    "free gift",
    "free info",
    "free offer",
    "free trial",
    "great offer",
    "increase sales",
    "lose weight",
    "no credit check",
    "no fees",
    "no hidden costs",
    "order now",
    "special promotion",
    "while supplies last",
    "winner",
];

pub const HAM_KEYWORDS: &[LexiconEntry] = &[
    LexiconEntry::new("meeting", 0.6),
    LexiconEntry::new("report", 0.5),
    LexiconEntry::new("project", 0.5),
    LexiconEntry::new("schedule", 0.6),
    LexiconEntry::new("update", 0.4),
    LexiconEntry::new("document", 0.5),
    LexiconEntry::new("team", 0.4),
    LexiconEntry::new("regards", 0.5),
    LexiconEntry::new("sincerely", 0.5),
    LexiconEntry::new("thanks", 0.4),
    LexiconEntry::new("please", 0.3),
    LexiconEntry::new("review", 0.4),
    LexiconEntry::new("discuss", 0.5),
    LexiconEntry::new("agenda", 0.6),
    LexiconEntry::new("minutes", 0.5),
];

/// A complete set of lexicons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicons {
    #[serde(default)]
    pub spam: Vec<LexiconEntry>,
    #[serde(default)]
    pub phrases: Vec<Cow<'static, str>>,
    #[serde(default)]
    pub ham: Vec<LexiconEntry>,
}

impl Lexicons {
    pub fn builtin() -> Self {
        Self {
            spam: SPAM_KEYWORDS.to_vec(),
            phrases: SPAM_PHRASES.iter().map(|p| Cow::Borrowed(*p)).collect(),
            ham: HAM_KEYWORDS.to_vec(),
        }
    }

    /// Load and validate lexicons from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SpamError::Config(format!("{}: {}", path.as_ref().display(), e)))?;

        let lexicons: Self = toml::from_str(&content)
            .map_err(|e| SpamError::Config(e.to_string()))?;
        lexicons.validate()?;
        Ok(lexicons)
    }

    /// Check weights and term shapes.
    ///
    /// Keyword terms are matched as whole words, so they must be single
    /// lower-case words; multi-word patterns belong in `phrases`.
    pub fn validate(&self) -> Result<()> {
        for entry in self.spam.iter().chain(self.ham.iter()) {
            if !(entry.weight > 0.0 && entry.weight <= 1.0) {
                return Err(SpamError::Config(format!(
                    "weight for '{}' must be in (0, 1], got {}",
                    entry.term, entry.weight
                )));
            }
            if entry.term.is_empty() || !entry.term.chars().all(is_keyword_char) {
                return Err(SpamError::Config(format!(
                    "keyword '{}' must be a single lower-case word",
                    entry.term
                )));
            }
        }

        for phrase in &self.phrases {
            if phrase.trim().is_empty() {
                return Err(SpamError::Config(format!("empty phrase '{}'", phrase)));
            }
            // Phrases are looked up in lower-cased text
            if phrase.to_lowercase() != **phrase {
                return Err(SpamError::Config(format!(
                    "phrase '{}' must be lower-case",
                    phrase
                )));
            }
        }

        Ok(())
    }

    /// Lexicon entries ranked by weight, heaviest first
    pub fn word_stats(&self) -> WordStats {
        WordStats {
            spam_words: ranked(&self.spam),
            ham_words: ranked(&self.ham),
            phrases: self.phrases.iter().map(|p| p.to_string()).collect(),
            phrase_weight: PHRASE_WEIGHT,
        }
    }

    /// Terms listed in both the spam and the ham lexicon
    pub fn overlapping_terms(&self) -> Vec<&str> {
        let ham: HashSet<&str> = self.ham.iter().map(|e| e.term.as_ref()).collect();
        self.spam
            .iter()
            .map(|e| e.term.as_ref())
            .filter(|t| ham.contains(t))
            .collect()
    }
}

impl Default for Lexicons {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Weighted terms of each lexicon side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordStats {
    pub spam_words: Vec<WordWeight>,
    pub ham_words: Vec<WordWeight>,
    pub phrases: Vec<String>,
    pub phrase_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordWeight {
    pub word: String,
    pub weight: f64,
}

fn ranked(entries: &[LexiconEntry]) -> Vec<WordWeight> {
    let mut words: Vec<WordWeight> = entries
        .iter()
        .map(|e| WordWeight {
            word: e.term.to_string(),
            weight: e.weight,
        })
        .collect();
    words.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    words
}

fn is_keyword_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_tables() {
        let lexicons = Lexicons::builtin();
        assert_eq!(lexicons.spam.len(), 30);
        assert_eq!(lexicons.phrases.len(), 30);
        assert_eq!(lexicons.ham.len(), 15);
        assert!(lexicons.validate().is_ok());
        assert!(lexicons.overlapping_terms().is_empty());
    }

    #[test]
    fn test_rejects_out_of_range_weight() {
        let mut lexicons = Lexicons::builtin();
        lexicons.spam.push(LexiconEntry::owned("jackpot", 1.5));
        assert!(matches!(lexicons.validate(), Err(SpamError::Config(_))));
    }

    #[test]
    fn test_rejects_multi_word_keyword() {
        let mut lexicons = Lexicons::builtin();
        lexicons.ham.push(LexiconEntry::owned("see you", 0.2));
        assert!(lexicons.validate().is_err());
    }

    #[test]
    fn test_rejects_upper_case_phrase() {
        let mut lexicons = Lexicons::builtin();
        lexicons.phrases.push(Cow::Owned("Wire Transfer".to_string()));
        assert!(matches!(lexicons.validate(), Err(SpamError::Config(_))));
    }

    #[test]
    fn test_word_stats_ranked_by_weight() {
        let stats = Lexicons::builtin().word_stats();
        assert_eq!(stats.spam_words.len(), 30);
        assert_eq!(stats.ham_words.len(), 15);
        assert_eq!(stats.phrases.len(), 30);
        assert_eq!(stats.phrase_weight, 0.8);

        // Highest weight first, ties keep table order
        assert_eq!(stats.spam_words[0].word, "viagra");
        assert_eq!(stats.spam_words[1].word, "winner");
        assert_eq!(stats.ham_words[0].word, "meeting");
        assert!(stats
            .spam_words
            .windows(2)
            .all(|w| w[0].weight >= w[1].weight));
        assert_eq!(stats.ham_words.last().unwrap().word, "please");
    }

    #[test]
    fn test_overlapping_terms() {
        let mut lexicons = Lexicons::builtin();
        lexicons.ham.push(LexiconEntry::owned("offer", 0.3));
        assert_eq!(lexicons.overlapping_terms(), vec!["offer"]);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
phrases = ["wire transfer"]

[[spam]]
term = "jackpot"
weight = 0.9

[[ham]]
term = "invoice"
weight = 0.4
"#
        )
        .unwrap();

        let lexicons = Lexicons::from_file(file.path()).unwrap();
        assert_eq!(lexicons.spam, vec![LexiconEntry::owned("jackpot", 0.9)]);
        assert_eq!(lexicons.phrases, vec![Cow::Borrowed("wire transfer")]);
        assert_eq!(lexicons.ham.len(), 1);
    }
}
