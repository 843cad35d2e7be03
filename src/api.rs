use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::category::{categorize, Category};
use crate::error::PipelineError;
use crate::pipeline::SentimentPipeline;
use crate::sentiment::PolarityScorer;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<SentimentPipeline>,
}

impl AppState {
    pub fn new(pipeline: SentimentPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/sentiment/{asset}", get(asset_sentiment))
        .route("/score", post(score_text))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct NoDataResp {
    status: &'static str,
    asset_id: String,
    message: String,
}

#[derive(serde::Serialize)]
struct ErrorResp {
    status: &'static str,
    message: String,
}

async fn asset_sentiment(State(state): State<AppState>, Path(asset): Path<String>) -> Response {
    let err = match state.pipeline.analyze(&asset).await {
        Ok(report) => return Json(report).into_response(),
        Err(e) => e,
    };

    let message = err.to_string();
    match err {
        PipelineError::EmptyAggregate { asset_id } => (
            StatusCode::NOT_FOUND,
            Json(NoDataResp {
                status: "no_data",
                asset_id,
                message,
            }),
        )
            .into_response(),
        PipelineError::InvalidAsset => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResp {
                status: "invalid_asset",
                message,
            }),
        )
            .into_response(),
    }
}

#[derive(serde::Deserialize)]
struct ScoreReq {
    text: String,
}

#[derive(serde::Serialize)]
struct ScoreResp {
    score: f64,
    category: Category,
}

async fn score_text(State(state): State<AppState>, Json(body): Json<ScoreReq>) -> Json<ScoreResp> {
    let score = crate::report::guard_score(state.pipeline.scorer().score(&body.text), &body.text);
    Json(ScoreResp {
        score,
        category: categorize(score),
    })
}
