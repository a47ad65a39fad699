//! Badge QR handler.

use axum::Json;
use axum::extract::State;

use crate::dto::request::QrRequest;
use crate::dto::response::{ApiResponse, QrImage};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /api/admin/qr
pub async fn generate(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<QrRequest>,
) -> ApiResult<Json<ApiResponse<QrImage>>> {
    let qr = state.qr_service.generate(&auth, &req.into())?;
    Ok(Json(ApiResponse::ok(qr.into())))
}
