//! # Aggregator
//! Runs every configured adapter for one asset and merges the results.
//!
//! Adapters run concurrently, each bounded by its own timeout. The merge is
//! done in adapter declaration order, never completion order, so the output
//! does not depend on network latency. A failed, timed-out or panicking
//! adapter simply contributes nothing.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use futures::future::join_all;
use futures::FutureExt;
use metrics::{counter, histogram};
use serde::Serialize;

use crate::error::FetchError;
use crate::ingest::ensure_metrics_described;
use crate::ingest::types::{RawHeadline, SourceAdapter};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// What happened to one adapter during an aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceOutcome {
    pub source: String,
    #[serde(flatten)]
    pub status: SourceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    Ok { headlines: usize },
    Failed { reason: String },
    TimedOut,
}

/// An ordered set of adapters plus the per-adapter time budget.
pub struct Aggregator {
    adapters: Vec<Box<dyn SourceAdapter>>,
    timeout: Duration,
}

impl Aggregator {
    pub fn new(adapters: Vec<Box<dyn SourceAdapter>>) -> Self {
        Self {
            adapters,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    pub async fn aggregate(&self, asset_id: &str) -> Vec<RawHeadline> {
        self.aggregate_detailed(asset_id).await.0
    }

    /// Like [`Aggregator::aggregate`], also reporting per-source outcomes in
    /// adapter order.
    pub async fn aggregate_detailed(
        &self,
        asset_id: &str,
    ) -> (Vec<RawHeadline>, Vec<SourceOutcome>) {
        run_adapters(&self.adapters, asset_id, self.timeout).await
    }
}

/// Free-function form over a borrowed, ordered adapter list. Zero adapters
/// yield an empty result.
pub async fn aggregate(
    asset_id: &str,
    adapters: &[Box<dyn SourceAdapter>],
    timeout: Duration,
) -> Vec<RawHeadline> {
    run_adapters(adapters, asset_id, timeout).await.0
}

async fn run_adapters(
    adapters: &[Box<dyn SourceAdapter>],
    asset_id: &str,
    timeout: Duration,
) -> (Vec<RawHeadline>, Vec<SourceOutcome>) {
    ensure_metrics_described();

    let calls = adapters
        .iter()
        .map(|a| fetch_bounded(a.as_ref(), asset_id, timeout));
    // join_all yields results in input order regardless of completion.
    let results = join_all(calls).await;

    let mut merged = Vec::new();
    let mut outcomes = Vec::with_capacity(adapters.len());

    for (adapter, res) in adapters.iter().zip(results) {
        let name = adapter.name();
        let status = match res {
            Ok(items) => {
                let before = merged.len();
                merged.extend(items.into_iter().filter(RawHeadline::is_valid));
                let n = merged.len() - before;
                counter!("ingest_headlines_total", "provider" => name.to_string())
                    .increment(n as u64);
                SourceStatus::Ok { headlines: n }
            }
            Err(FetchError::Timeout(limit)) => {
                tracing::warn!(target: "ingest", provider = name, asset = asset_id, ?limit, "provider timed out");
                counter!("ingest_provider_timeouts_total", "provider" => name.to_string())
                    .increment(1);
                SourceStatus::TimedOut
            }
            Err(e) => {
                tracing::warn!(target: "ingest", error = %e, provider = name, asset = asset_id, "provider error");
                counter!(
                    "ingest_provider_errors_total",
                    "provider" => name.to_string(),
                    "kind" => e.kind()
                )
                .increment(1);
                SourceStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };
        outcomes.push(SourceOutcome {
            source: name.to_string(),
            status,
        });
    }

    tracing::debug!(
        target: "ingest",
        asset = asset_id,
        sources = outcomes.len(),
        headlines = merged.len(),
        "aggregation finished"
    );

    (merged, outcomes)
}

async fn fetch_bounded(
    adapter: &dyn SourceAdapter,
    asset_id: &str,
    limit: Duration,
) -> Result<Vec<RawHeadline>, FetchError> {
    let t0 = Instant::now();
    // A panicking adapter must not unwind through the other sources.
    let call = AssertUnwindSafe(adapter.fetch(asset_id)).catch_unwind();
    let res = match tokio::time::timeout(limit, call).await {
        Ok(Ok(r)) => r,
        Ok(Err(payload)) => Err(FetchError::Panicked(panic_message(&*payload))),
        Err(_) => Err(FetchError::Timeout(limit)),
    };
    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("ingest_fetch_ms", "provider" => adapter.name().to_string()).record(ms);
    res
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
