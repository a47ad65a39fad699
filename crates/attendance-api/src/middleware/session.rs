//! Ends application sessions whose store token has been refused.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, SignedCookieJar};

use crate::error::StoreSessionRejected;
use crate::extractors::session_id;
use crate::state::AppState;

/// When a handler's store call was refused for a dead token, destroy the
/// application session and clear the cookie so `/me` agrees.
pub async fn expire_rejected_sessions(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let id = session_id(request.headers(), &state);
    let jar = SignedCookieJar::from_headers(request.headers(), state.cookie_key.clone());

    let response = next.run(request).await;

    match id {
        Some(id) if response.extensions().get::<StoreSessionRejected>().is_some() => {
            state.bridge.expire(&id).await;
            let jar = jar.remove(Cookie::build((state.cookie_name().to_string(), "")).path("/"));
            (jar, response).into_response()
        }
        _ => response,
    }
}
