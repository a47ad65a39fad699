//! Event type handlers: public listing and admin CRUD.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use attendance_entity::EventTypeRecord;

use crate::dto::request::{CreateEventTypeRequest, UpdateEventTypeRequest};
use crate::dto::response::{ApiResponse, Empty, Rows};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson, ValidPath};
use crate::state::AppState;

/// Wraps a single event type.
#[derive(Debug, Clone, Serialize)]
pub struct TypeEnvelope {
    #[serde(rename = "type")]
    pub event_type: EventTypeRecord,
}

/// GET /api/event-types
pub async fn list_active(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Rows<EventTypeRecord>>>> {
    let rows = state.event_type_service.list_active(&auth).await?;
    Ok(Json(ApiResponse::ok(Rows { rows })))
}

/// GET /api/admin/event-types
pub async fn list_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Rows<EventTypeRecord>>>> {
    let rows = state.event_type_service.list_all(&auth).await?;
    Ok(Json(ApiResponse::ok(Rows { rows })))
}

/// POST /api/admin/event-types
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateEventTypeRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TypeEnvelope>>)> {
    let event_type = state.event_type_service.create(&auth, req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(TypeEnvelope { event_type })),
    ))
}

/// PATCH /api/admin/event-types/{code}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(code): ValidPath<String>,
    ValidJson(req): ValidJson<UpdateEventTypeRequest>,
) -> ApiResult<Json<ApiResponse<TypeEnvelope>>> {
    let event_type = state
        .event_type_service
        .update(&auth, &code, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(TypeEnvelope { event_type })))
}

/// DELETE /api/admin/event-types/{code}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(code): ValidPath<String>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    state.event_type_service.delete(&auth, &code).await?;
    Ok(Json(ApiResponse::done()))
}
