// tests/metrics.rs
//
// Single test per binary: the Prometheus recorder is process-global.

use std::sync::Arc;

use async_trait::async_trait;
use asset_sentiment::ingest::providers::StaticAdapter;
use asset_sentiment::metrics::Metrics;
use asset_sentiment::{
    Aggregator, FetchError, LexiconScorer, RawHeadline, SentimentPipeline, SourceAdapter,
};

struct FlakyProvider;

#[async_trait]
impl SourceAdapter for FlakyProvider {
    async fn fetch(&self, _asset_id: &str) -> Result<Vec<RawHeadline>, FetchError> {
        Err(FetchError::Parse("truncated json".into()))
    }
    fn name(&self) -> &str {
        "Flaky"
    }
}

#[tokio::test]
async fn pipeline_series_are_exposed() {
    let metrics = Metrics::init(8).expect("recorder");

    let pipeline = SentimentPipeline::new(
        Aggregator::new(vec![
            Box::new(StaticAdapter::from_pairs(
                "Demo",
                [("Ethereum rallies on upgrade", "https://d.test/1")],
            )),
            Box::new(FlakyProvider),
        ]),
        Arc::new(LexiconScorer::new()),
    );
    pipeline.analyze("eth").await.expect("report");

    let empty = SentimentPipeline::new(Aggregator::new(vec![]), Arc::new(LexiconScorer::new()));
    assert!(empty.analyze("eth").await.is_err());

    let out = metrics.handle.render();
    assert!(out.contains("ingest_headlines_total"));
    assert!(out.contains("ingest_provider_errors_total"));
    assert!(out.contains("ingest_fetch_ms"));
    assert!(out.contains("sentiment_reports_total"));
    assert!(out.contains("sentiment_empty_total"));
    assert!(out.contains("ingest_source_timeout_secs"));
}
