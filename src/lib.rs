// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod category;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod sentiment;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router as router;
pub use crate::category::{categorize, Category};
pub use crate::error::{FetchError, PipelineError};
pub use crate::ingest::config::SourcesConfig;
pub use crate::ingest::types::{RawHeadline, SourceAdapter};
pub use crate::ingest::Aggregator;
pub use crate::pipeline::SentimentPipeline;
pub use crate::report::{build_report, AggregateReport, CategoryCounts, ScoredHeadline};
pub use crate::sentiment::{LexiconScorer, PolarityScorer};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the fmt subscriber unless `SENTIMENT_LOG=0`.
/// `SENTIMENT_LOG_JSON=1` switches to JSON lines. Safe to call twice.
pub fn init_tracing() {
    if std::env::var("SENTIMENT_LOG").ok().as_deref() == Some("0") {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("asset_sentiment=info,ingest=info,pipeline=info,warn"));

    let json = std::env::var("SENTIMENT_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
    // Another subscriber (e.g. the deployment runtime's) may already be set.
    let _ = res;
}
