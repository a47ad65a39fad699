//! Auth handlers: login, logout, me.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};

use attendance_core::error::AppError;

use crate::dto::request::LoginRequest;
use crate::dto::response::{ApiResponse, Empty, SessionUser, UserEnvelope};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ApiResult<(SignedCookieJar, Json<ApiResponse<UserEnvelope>>)> {
    let session = state
        .bridge
        .login(&req.username, &req.password)
        .await
        .map_err(|e| {
            if e.is_backend_unavailable() {
                AppError::backend_unavailable("login_failed")
            } else {
                e
            }
        })?;

    let cookie = Cookie::build((state.cookie_name().to_string(), session.id.as_str().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.session.secure_cookie);

    let body = ApiResponse::ok(UserEnvelope {
        user: SessionUser::from(&session),
    });
    Ok((jar.add(cookie), Json(body)))
}

/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    auth: AuthUser,
) -> (SignedCookieJar, Json<ApiResponse<Empty>>) {
    state.bridge.logout(&auth.session.id).await;
    let jar = jar.remove(Cookie::build((state.cookie_name().to_string(), "")).path("/"));
    (jar, Json(ApiResponse::done()))
}

/// GET /me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<UserEnvelope>> {
    Json(ApiResponse::ok(UserEnvelope {
        user: SessionUser::from(&auth.session),
    }))
}
