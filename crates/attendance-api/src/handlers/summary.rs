//! Dashboard metrics handlers.

use axum::Json;
use axum::extract::State;

use attendance_service::{DbDetails, Summary};

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/summary
pub async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Summary>>> {
    let summary = state.summary_service.summary(&auth).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// GET /api/db-details
pub async fn db_details(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<DbDetails>>> {
    let details = state.summary_service.db_details(&auth).await?;
    Ok(Json(ApiResponse::ok(details)))
}
