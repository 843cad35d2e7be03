//! # Sentiment Scorer
//! Text → polarity in `[-1, 1]`.
//!
//! The pipeline only depends on [`PolarityScorer`]. The bundled
//! [`LexiconScorer`] averages word polarities from an embedded lexicon,
//! letting intensifiers scale the next word and nearby negators flip it.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct Lexicon {
    words: HashMap<String, f64>,
    #[serde(default)]
    intensifiers: HashMap<String, f64>,
}

static LEXICON: Lazy<Lexicon> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<Lexicon>(raw).expect("valid sentiment lexicon")
});

/// Negated words keep half their magnitude with the sign flipped.
const NEGATION_FACTOR: f64 = -0.5;
/// How many preceding tokens are checked for a negator.
const NEGATION_WINDOW: usize = 3;

/// Pure polarity function consumed by the report builder.
///
/// Implementations must be deterministic and return values in `[-1, 1]`;
/// empty or whitespace-only text scores `0.0`.
pub trait PolarityScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

impl<F> PolarityScorer for F
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    fn score(&self, text: &str) -> f64 {
        self(text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_polarity(&self, w: &str) -> Option<f64> {
        LEXICON.words.get(w).copied()
    }

    #[inline]
    fn intensity(&self, w: &str) -> Option<f64> {
        LEXICON.intensifiers.get(w).copied()
    }

    /// Returns `(polarity, number of sentiment-bearing tokens)`.
    pub fn score_detailed(&self, text: &str) -> (f64, usize) {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut sum = 0.0f64;
        let mut hits = 0usize;

        for (i, tok) in tokens.iter().enumerate() {
            let Some(base) = self.word_polarity(tok) else {
                continue;
            };

            let mut v = base;
            if let Some(m) = i.checked_sub(1).and_then(|j| self.intensity(&tokens[j])) {
                v *= m;
            }

            let negated = (1..=NEGATION_WINDOW).any(|k| i >= k && is_negator(&tokens[i - k]));
            if negated {
                v *= NEGATION_FACTOR;
            }

            sum += v.clamp(-1.0, 1.0);
            hits += 1;
        }

        if hits == 0 {
            return (0.0, 0);
        }
        ((sum / hits as f64).clamp(-1.0, 1.0), hits)
    }
}

impl PolarityScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        self.score_detailed(text).0
    }
}

/// Lower-cased word tokens; apostrophes stay inside words ("isn't").
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|t| t.trim_matches(|c| c == '\'' || c == '\u{2019}'))
        .filter(|t| !t.is_empty())
        .map(|t| t.replace('\u{2019}', "'").to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "doesn't"
            | "didn't"
            | "without"
    )
}
