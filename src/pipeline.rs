//! # Sentiment Pipeline
//! Aggregate → (optional dedup) → score + categorize → report, for one asset.
//!
//! The result is all-or-nothing: a full report, or `EmptyAggregate` when no
//! source produced a headline. An empty result is never reported as Neutral.

use std::sync::Arc;

use anyhow::Result;
use metrics::counter;

use crate::error::PipelineError;
use crate::ingest::config::SourcesConfig;
use crate::ingest::{dedup_by_title, Aggregator, SourceStatus};
use crate::report::{build_report, AggregateReport};
use crate::sentiment::{LexiconScorer, PolarityScorer};

pub struct SentimentPipeline {
    aggregator: Aggregator,
    scorer: Arc<dyn PolarityScorer>,
    dedup: bool,
}

impl SentimentPipeline {
    pub fn new(aggregator: Aggregator, scorer: Arc<dyn PolarityScorer>) -> Self {
        Self {
            aggregator,
            scorer,
            dedup: false,
        }
    }

    /// Enable the title dedup transform between aggregation and scoring.
    pub fn with_dedup(mut self, on: bool) -> Self {
        self.dedup = on;
        self
    }

    /// Adapters from config, lexicon scorer.
    pub fn from_config(cfg: &SourcesConfig) -> Result<Self> {
        let aggregator = cfg.aggregator()?;
        Ok(Self::new(aggregator, Arc::new(LexiconScorer::new())).with_dedup(cfg.dedup))
    }

    pub fn scorer(&self) -> &dyn PolarityScorer {
        self.scorer.as_ref()
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Run one query. `asset` is trimmed and upper-cased first.
    pub async fn analyze(&self, asset: &str) -> Result<AggregateReport, PipelineError> {
        let asset_id = normalize_asset_id(asset).ok_or(PipelineError::InvalidAsset)?;

        let (mut raw, outcomes) = self.aggregator.aggregate_detailed(&asset_id).await;

        let failed = outcomes
            .iter()
            .filter(|o| !matches!(o.status, SourceStatus::Ok { .. }))
            .count();
        tracing::info!(
            target: "pipeline",
            asset = asset_id.as_str(),
            sources = outcomes.len(),
            failed,
            headlines = raw.len(),
            "sources aggregated"
        );

        if self.dedup {
            let (kept, removed) = dedup_by_title(raw);
            if removed > 0 {
                tracing::debug!(target: "pipeline", asset = asset_id.as_str(), removed, "duplicate titles dropped");
                counter!("ingest_dedup_total").increment(removed as u64);
            }
            raw = kept;
        }

        if raw.is_empty() {
            counter!("sentiment_empty_total").increment(1);
            return Err(PipelineError::EmptyAggregate { asset_id });
        }

        let report = build_report(&asset_id, raw, self.scorer.as_ref());
        counter!("sentiment_reports_total").increment(1);
        tracing::info!(
            target: "pipeline",
            asset = report.asset_id.as_str(),
            items = report.items.len(),
            mean = report.mean_sentiment,
            overall = %report.overall_category,
            "report built"
        );
        Ok(report)
    }
}

/// Trim and upper-case a ticker/symbol; blank input is rejected.
pub fn normalize_asset_id(raw: &str) -> Option<String> {
    let t = raw.trim();
    (!t.is_empty()).then(|| t.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_ids_are_uppercased() {
        assert_eq!(normalize_asset_id(" aapl "), Some("AAPL".to_string()));
        assert_eq!(normalize_asset_id("goto.jk"), Some("GOTO.JK".to_string()));
        assert_eq!(normalize_asset_id("   "), None);
    }
}
