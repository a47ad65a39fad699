//! Route definitions for the attendance HTTP API.
//!
//! Session routes sit at the root; everything else is mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use std::time::Duration;

use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::headers::security_header_layers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(dashboard_routes())
        .merge(event_routes())
        .merge(admin_routes(state.clone()));

    let mut router = Router::new()
        .merge(session_routes())
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::session::expire_rejected_sessions,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ));
    for layer in security_header_layers() {
        router = router.layer(layer);
    }
    router.with_state(state)
}

/// Login, logout, me
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::me))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Summary and raw database metadata
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(handlers::summary::summary))
        .route("/db-details", get(handlers::summary::db_details))
}

/// Event listing/recording and the active event type catalogue
fn event_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/events",
            get(handlers::event::list_events).post(handlers::event::create_event),
        )
        .route("/event-types", get(handlers::event_type::list_active))
}

/// Admin-only: event type CRUD, account administration, badge QR codes
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/admin/event-types",
            get(handlers::event_type::list_all).post(handlers::event_type::create),
        )
        .route(
            "/admin/event-types/{code}",
            patch(handlers::event_type::update).delete(handlers::event_type::delete),
        )
        .route(
            "/users",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route(
            "/users/{name}",
            patch(handlers::user::update_user).delete(handlers::user::delete_user),
        )
        .route("/admin/qr", post(handlers::qr::generate))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::rbac::require_admin,
        ))
}
