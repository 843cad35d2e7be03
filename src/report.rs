//! # Report Builder
//! Scores and categorizes merged headlines and summarizes them per asset.
//! No I/O; the same input and scorer always give the same report.

use metrics::counter;
use serde::Serialize;

use crate::category::{categorize, Category};
use crate::ingest::types::RawHeadline;
use crate::sentiment::PolarityScorer;

/// A headline with its polarity and bucket. Built only by [`build_report`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredHeadline {
    #[serde(flatten)]
    headline: RawHeadline,
    sentiment: f64,
    category: Category,
}

impl ScoredHeadline {
    fn new(headline: RawHeadline, sentiment: f64) -> Self {
        Self {
            category: categorize(sentiment),
            headline,
            sentiment,
        }
    }

    pub fn headline(&self) -> &RawHeadline {
        &self.headline
    }

    pub fn title(&self) -> &str {
        &self.headline.title
    }

    pub fn link(&self) -> &str {
        &self.headline.link
    }

    pub fn source(&self) -> &str {
        &self.headline.source
    }

    pub fn sentiment(&self) -> f64 {
        self.sentiment
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

/// Items per category. Always carries all three buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct CategoryCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl CategoryCounts {
    pub fn get(&self, c: Category) -> usize {
        match c {
            Category::Positive => self.positive,
            Category::Negative => self.negative,
            Category::Neutral => self.neutral,
        }
    }

    fn add(&mut self, c: Category) {
        match c {
            Category::Positive => self.positive += 1,
            Category::Negative => self.negative += 1,
            Category::Neutral => self.neutral += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// How many items each source contributed, in first-appearance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: String,
    pub count: usize,
}

/// Per-request summary for one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    pub asset_id: String,
    pub items: Vec<ScoredHeadline>,
    /// Arithmetic mean of item sentiments; `0.0` when `items` is empty,
    /// which must be checked with [`AggregateReport::is_empty`].
    pub mean_sentiment: f64,
    pub category_counts: CategoryCounts,
    pub overall_category: Category,
    pub sources: Vec<SourceCount>,
}

impl AggregateReport {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Clamp policy for scorer output. NaN becomes `0.0`, anything outside
/// `[-1, 1]` is clamped; both are logged and counted.
pub fn guard_score(raw: f64, text: &str) -> f64 {
    if raw.is_nan() {
        tracing::warn!(target: "report", text_len = text.len(), "scorer returned NaN; using 0.0");
        counter!("sentiment_invalid_score_total").increment(1);
        return 0.0;
    }
    if !(-1.0..=1.0).contains(&raw) {
        tracing::warn!(target: "report", score = raw, text_len = text.len(), "scorer out of range; clamping");
        counter!("sentiment_invalid_score_total").increment(1);
        return raw.clamp(-1.0, 1.0);
    }
    raw
}

/// Score every headline (input order preserved), tally buckets, and derive
/// the overall category from the mean with the same thresholds as items.
pub fn build_report<S>(asset_id: &str, raw: Vec<RawHeadline>, scorer: &S) -> AggregateReport
where
    S: PolarityScorer + ?Sized,
{
    let mut counts = CategoryCounts::default();
    let mut sources: Vec<SourceCount> = Vec::new();
    let mut sum = 0.0f64;

    let items: Vec<ScoredHeadline> = raw
        .into_iter()
        .map(|h| {
            let score = guard_score(scorer.score(&h.title), &h.title);
            sum += score;

            match sources.iter_mut().find(|s| s.source == h.source) {
                Some(s) => s.count += 1,
                None => sources.push(SourceCount {
                    source: h.source.clone(),
                    count: 1,
                }),
            }

            let item = ScoredHeadline::new(h, score);
            counts.add(item.category);
            item
        })
        .collect();

    let mean_sentiment = if items.is_empty() {
        0.0
    } else {
        sum / items.len() as f64
    };

    AggregateReport {
        asset_id: asset_id.to_string(),
        items,
        mean_sentiment,
        category_counts: counts,
        overall_category: categorize(mean_sentiment),
        sources,
    }
}
