//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let report = state.summary_service.health().await;
    Json(ApiResponse::ok(HealthResponse {
        status: report.status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: report.backend.to_string(),
    }))
}
