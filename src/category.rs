//! # Categorizer
//! Maps a polarity score onto one of three fixed buckets.
//!
//! The same rule is used for every headline and for the aggregate mean, so an
//! item and a report with equal scores always land in the same bucket.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores strictly above this are Positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Scores strictly below this are Negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Sentiment bucket of a headline or of a whole report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Positive,
    Negative,
    Neutral,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Positive, Category::Negative, Category::Neutral];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Positive => "POSITIVE",
            Category::Negative => "NEGATIVE",
            Category::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `> 0.1` Positive, `< -0.1` Negative, the closed band `[-0.1, 0.1]` Neutral.
/// NaN falls through to Neutral.
pub fn categorize(score: f64) -> Category {
    if score > POSITIVE_THRESHOLD {
        Category::Positive
    } else if score < NEGATIVE_THRESHOLD {
        Category::Negative
    } else {
        Category::Neutral
    }
}
