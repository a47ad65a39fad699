//! Per-request access log.
//!
//! Only the path is recorded; query strings can carry page bookmarks and
//! filter values that have no place in logs.

use std::time::Instant;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Level, debug, info, warn};

/// Paths polled by load balancers, logged at debug only.
const PROBE_PATHS: &[&str] = &["/api/health"];

/// Logs method, path, status and latency of every request.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;
    match level_for(&path, status) {
        Level::WARN => warn!(%method, %path, status = status.as_u16(), latency_ms, "Request failed"),
        Level::DEBUG => debug!(%method, %path, status = status.as_u16(), latency_ms, "Probe"),
        _ => info!(%method, %path, status = status.as_u16(), latency_ms, "Request"),
    }

    response
}

fn level_for(path: &str, status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::WARN
    } else if PROBE_PATHS.contains(&path) {
        Level::DEBUG
    } else {
        Level::INFO
    }
}
