//! Role guard for admin-only route groups.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Rejects callers without the configured admin role.
///
/// Unauthenticated callers get 401 from the extractor; authenticated ones
/// lacking the role get 403.
pub async fn require_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    state.roles.require_admin(&auth.session)?;
    Ok(next.run(request).await)
}
