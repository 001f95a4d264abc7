use std::{any::Any, sync::Arc};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clipcheck_core::{EvaluateError, EvaluateRequest, Pipeline};
use serde::Serialize;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

#[derive(Serialize)]
struct EvaluateResponse {
    evaluation: String,
}

/// Maps pipeline errors onto the public HTTP contract
pub struct ApiError(EvaluateError);

impl From<EvaluateError> for ApiError {
    fn from(err: EvaluateError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            EvaluateError::Validation => StatusCode::BAD_REQUEST,
            EvaluateError::PipelineFailed => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/evaluate", post(evaluate_handler))
        .route("/health", get(health_handler))
        // CORS wraps the panic catcher so a panicked request still carries its headers
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .with_state(AppState { pipeline })
}

async fn health_handler() -> &'static str {
    "ok"
}

/// `POST /evaluate`. Bodies that don't decode count as a missing videoId.
async fn evaluate_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EvaluateResponse>, ApiError> {
    let request: EvaluateRequest = serde_json::from_slice(&body).unwrap_or_default();
    let report = state.pipeline.evaluate(&request).await?;

    Ok(Json(EvaluateResponse {
        evaluation: report.into_inner(),
    }))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());
    error!(%detail, "Request handler panicked");

    ApiError(EvaluateError::PipelineFailed).into_response()
}
