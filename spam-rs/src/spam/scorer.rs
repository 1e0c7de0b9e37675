//! Lexical spam scoring engine
//!
//! Scores free text against weighted spam and ham lexicons, a list of spam
//! phrases and three structural heuristics (capitalization, exclamation
//! marks, URLs). The result carries a label, a confidence and the list of
//! matched terms that explains it.

use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{trace, warn};

use super::lexicon::{Lexicons, PHRASE_WEIGHT};
use super::types::*;
use crate::error::Result;

pub const CAPS_LABEL: &str = "EXCESSIVE CAPS";
pub const EXCLAMATION_LABEL: &str = "!!!";
pub const URL_LABEL: &str = "URLs";

const CAPS_RATIO_THRESHOLD: f64 = 0.3;
const CAPS_WEIGHT: f64 = 0.7;
const EXCLAMATION_THRESHOLD: usize = 3;
const EXCLAMATION_WEIGHT: f64 = 0.5;
const URL_WEIGHT: f64 = 0.4;
const URL_MARKERS: [&str; 3] = ["http://", "https://", "www."];

const NEUTRAL_SCORE: f64 = 0.5;
const CONFIDENCE_CAP: f64 = 0.98;

/// Score `text` with the built-in lexicons
pub fn score(text: &str) -> ClassificationResult {
    LexicalScorer::shared().score(text)
}

/// Running sums of one scoring pass
#[derive(Debug, Default)]
struct Tally {
    spam_score: f64,
    ham_score: f64,
    total_weight: f64,
    spam_side: Vec<WordInfluence>,
    ham_side: Vec<WordInfluence>,
}

impl Tally {
    fn add_spam(&mut self, term: &str, weight: f64) {
        self.spam_score += weight;
        self.total_weight += weight;
        self.spam_side.push(WordInfluence::new(term, weight));
    }

    fn add_ham(&mut self, term: &str, weight: f64) {
        self.ham_score += weight;
        self.total_weight += weight;
        self.ham_side.push(WordInfluence::new(term, -weight));
    }

    fn final_score(&self) -> f64 {
        if self.total_weight > 0.0 {
            self.spam_score / self.total_weight
        } else {
            NEUTRAL_SCORE
        }
    }
}

/// Lexical spam scorer
#[derive(Debug, Clone)]
pub struct LexicalScorer {
    lexicons: Lexicons,
}

impl LexicalScorer {
    /// Create a scorer over the built-in lexicons
    pub fn new() -> Self {
        Self {
            lexicons: Lexicons::builtin(),
        }
    }

    /// Create a scorer over custom lexicons
    pub fn with_lexicons(lexicons: Lexicons) -> Result<Self> {
        lexicons.validate()?;

        // Overlapping terms contribute on both sides
        for term in lexicons.overlapping_terms() {
            warn!("Term '{}' is in both spam and ham lexicons", term);
        }

        Ok(Self { lexicons })
    }

    /// Process-wide scorer over the built-in lexicons
    pub fn shared() -> &'static LexicalScorer {
        static SHARED: OnceLock<LexicalScorer> = OnceLock::new();
        SHARED.get_or_init(LexicalScorer::new)
    }

    pub fn lexicons(&self) -> &Lexicons {
        &self.lexicons
    }

    /// Classify a message
    pub fn score(&self, text: &str) -> ClassificationResult {
        let tally = self.tally(text);
        let final_score = tally.final_score();

        let prediction = if final_score > NEUTRAL_SCORE {
            Prediction::Spam
        } else {
            Prediction::Ham
        };
        let confidence = (NEUTRAL_SCORE + (final_score - NEUTRAL_SCORE).abs() * 2.0).min(CONFIDENCE_CAP);

        let mut word_influence = tally.spam_side;
        word_influence.extend(tally.ham_side);
        word_influence.sort_by(|a, b| b.influence.abs().total_cmp(&a.influence.abs()));

        ClassificationResult {
            prediction,
            confidence,
            word_influence,
        }
    }

    /// Spam mass over total mass, 0.5 when nothing matched
    pub fn final_score(&self, text: &str) -> f64 {
        self.tally(text).final_score()
    }

    fn tally(&self, text: &str) -> Tally {
        let lowered = text.to_lowercase();
        let words = word_counts(&lowered);
        let mut tally = Tally::default();

        for entry in &self.lexicons.spam {
            if let Some(&count) = words.get(&*entry.term) {
                tally.add_spam(&entry.term, entry.weight * count as f64);
            }
        }

        for phrase in &self.lexicons.phrases {
            if lowered.contains(&phrase[..]) {
                tally.add_spam(phrase, PHRASE_WEIGHT);
            }
        }

        for entry in &self.lexicons.ham {
            if let Some(&count) = words.get(&*entry.term) {
                tally.add_ham(&entry.term, entry.weight * count as f64);
            }
        }

        if caps_ratio(text) > CAPS_RATIO_THRESHOLD {
            tally.add_spam(CAPS_LABEL, CAPS_WEIGHT);
        }

        if text.matches('!').count() > EXCLAMATION_THRESHOLD {
            tally.add_spam(EXCLAMATION_LABEL, EXCLAMATION_WEIGHT);
        }

        let urls = count_urls(text);
        if urls > 0 {
            tally.add_spam(URL_LABEL, URL_WEIGHT * urls as f64);
        }

        trace!(
            spam = tally.spam_score,
            ham = tally.ham_score,
            total = tally.total_weight,
            "Scored message"
        );
        tally
    }
}

impl Default for LexicalScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Occurrences of each whole word.
///
/// Words are maximal runs of ASCII letters, digits and `_`; everything else
/// (including non-ASCII letters) separates words.
fn word_counts(lowered: &str) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for word in lowered
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
    {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
}

/// Uppercase ASCII letters over non-whitespace characters.
///
/// Characters are counted in UTF-16 units, so a character outside the BMP
/// (most emoji) weighs two.
fn caps_ratio(text: &str) -> f64 {
    let visible: usize = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(char::len_utf16)
        .sum();
    if visible == 0 {
        return 0.0;
    }
    let upper = text.chars().filter(|c| c.is_ascii_uppercase()).count();
    upper as f64 / visible as f64
}

fn count_urls(text: &str) -> usize {
    URL_MARKERS.iter().map(|m| text.matches(m).count()).sum()
}
