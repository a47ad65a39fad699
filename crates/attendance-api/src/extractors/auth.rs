//! `AuthUser` extractor: reads the signed session cookie, loads the
//! application session, and injects a request context.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum_extra::extract::cookie::SignedCookieJar;

use attendance_auth::SessionId;
use attendance_core::error::AppError;
use attendance_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The session id carried by a validly signed cookie, if any.
pub fn session_id(headers: &HeaderMap, state: &AppState) -> Option<SessionId> {
    let jar = SignedCookieJar::from_headers(headers, state.cookie_key.clone());
    jar.get(state.cookie_name())
        .and_then(|cookie| SessionId::from_raw(cookie.value()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = session_id(&parts.headers, state)
            .ok_or_else(|| AppError::unauthenticated("Not authenticated"))?;

        // Expired or logged-out sessions are simply absent.
        let session = state
            .bridge
            .current(&id)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Not authenticated"))?;

        Ok(AuthUser(RequestContext::new(session)))
    }
}
