//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use attendance_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false`.
    pub ok: bool,
    /// Human-readable message.
    pub message: String,
    /// Status code the document store answered with, when one did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidCredentials | ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::BackendUnavailable | ErrorKind::QueryFailed => StatusCode::BAD_GATEWAY,
        ErrorKind::FeatureUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Configuration | ErrorKind::Serialization | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<&AppError> for ApiErrorResponse {
    fn from(err: &AppError) -> Self {
        let status = match err.kind {
            ErrorKind::BackendUnavailable | ErrorKind::QueryFailed => err.backend_status,
            _ => None,
        };
        Self {
            ok: false,
            message: err.message.clone(),
            status,
        }
    }
}

/// Response extension set when the store refused the caller's session
/// token. The session expiry middleware acts on it.
#[derive(Debug, Clone, Copy)]
pub struct StoreSessionRejected;

/// Renders any error as the `{ ok: false, message }` envelope.
pub fn render(err: AppError) -> Response {
    if err.is_session_rejected() {
        tracing::info!(error = %err.message, "Store refused session token");
        let body = ApiErrorResponse {
            ok: false,
            message: "Session expired".into(),
            status: None,
        };
        let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        response.extensions_mut().insert(StoreSessionRejected);
        return response;
    }

    let status = status_for(err.kind);
    if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
        tracing::error!(kind = %err.kind, error = %err.message, "Internal server error");
    } else if status == StatusCode::BAD_GATEWAY {
        tracing::warn!(kind = %err.kind, error = %err.message, status = ?err.backend_status, "Store request failed");
    }
    (status, Json(ApiErrorResponse::from(&err))).into_response()
}

/// Wrapper so `AppError` can be returned straight from handlers.
///
/// `AppError` lives in `attendance-core`, so the `IntoResponse` impl hangs
/// off this local newtype and `?` converts through `From`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        render(self.0)
    }
}

/// Handler result type.
pub type ApiResult<T> = Result<T, ApiError>;
