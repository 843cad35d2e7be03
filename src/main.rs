//! Asset sentiment service: binary entrypoint.
//! Boots the Axum HTTP server: loads source config, builds the pipeline,
//! and mounts the API plus `/metrics`.

use anyhow::Context;
use asset_sentiment::{api, metrics::Metrics, SentimentPipeline, SourcesConfig};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // Picks up SENTIMENT_SOURCES_PATH / NEWSAPI_KEY.
    let _ = dotenvy::dotenv();

    asset_sentiment::init_tracing();

    let cfg = SourcesConfig::load_default().context("loading sources config")?;
    tracing::info!(
        sources = cfg.sources.iter().filter(|s| s.enabled).count(),
        timeout_secs = cfg.timeout_secs,
        max_items = cfg.max_items,
        dedup = cfg.dedup,
        "sources config loaded"
    );

    let metrics = Metrics::init(cfg.timeout_secs)?;
    let pipeline = SentimentPipeline::from_config(&cfg)?;

    let router = api::create_router(api::AppState::new(pipeline)).merge(metrics.router());

    Ok(router.into())
}
