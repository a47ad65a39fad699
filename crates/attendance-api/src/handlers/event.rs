//! Event handlers: cursor-paginated listing and recording.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use attendance_entity::EventRecord;

use crate::dto::request::{CreateEventRequest, EventsQuery};
use crate::dto::response::{ApiResponse, Created, CursorPage};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PageParams, ValidJson, ValidQuery};
use crate::state::AppState;

/// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(filter): ValidQuery<EventsQuery>,
    ValidQuery(paging): ValidQuery<PageParams>,
) -> ApiResult<Json<ApiResponse<CursorPage<EventRecord>>>> {
    let page = state
        .event_service
        .list(&auth, &filter.into(), paging.limit(), paging.cursor())
        .await?;
    Ok(Json(ApiResponse::ok(page.into())))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Created>>)> {
    let event = state
        .event_service
        .create(&auth, &req.type_code, &req.qr_data)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(Created { id: event.id })),
    ))
}
