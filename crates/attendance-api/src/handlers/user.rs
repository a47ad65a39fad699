//! Account administration handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use attendance_entity::UserProfile;

use crate::dto::request::{CreateUserRequest, UpdateUserRequest};
use crate::dto::response::{ApiResponse, Empty, Rows};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson, ValidPath};
use crate::state::AppState;

/// Wraps a single profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileEnvelope {
    pub user: UserProfile,
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Rows<UserProfile>>>> {
    let rows = state.user_service.list(&auth).await?;
    Ok(Json(ApiResponse::ok(Rows { rows })))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ProfileEnvelope>>)> {
    let user = state.user_service.create(&auth, req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ProfileEnvelope { user })),
    ))
}

/// PATCH /api/users/{name}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(name): ValidPath<String>,
    ValidJson(req): ValidJson<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<ProfileEnvelope>>> {
    let user = state.user_service.update(&auth, &name, req.into()).await?;
    Ok(Json(ApiResponse::ok(ProfileEnvelope { user })))
}

/// DELETE /api/users/{name}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(name): ValidPath<String>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    state.user_service.delete(&auth, &name).await?;
    Ok(Json(ApiResponse::done()))
}
