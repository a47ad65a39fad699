//! Application builder: wires router, middleware and state into an Axum
//! app, and runs it until a shutdown signal arrives.

use std::sync::Arc;

use axum::Router;
use tracing::{error, info, warn};

use attendance_core::config::AppConfig;
use attendance_core::error::AppError;
use attendance_core::result::AppResult;
use attendance_core::traits::DocumentStore;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the attendance server over an already-connected store.
pub async fn run_server(config: AppConfig, store: Arc<dyn DocumentStore>) -> AppResult<()> {
    // ── Step 1: Probe the store ──────────────────────────────────
    match store.is_online().await {
        Ok(true) => info!("Document store is reachable"),
        Ok(false) => warn!("Document store answered but reports not ready"),
        Err(e) => warn!(error = %e, "Document store unreachable at startup; continuing"),
    }

    // ── Step 2: Wire services ────────────────────────────────────
    if config.store.admin_credential().is_none() {
        warn!("No admin credential configured; user administration and user counts are disabled");
    }
    if config.server.tls.enabled {
        warn!("TLS is terminated outside this process; serving plain HTTP");
    }
    let addr = config.server.bind_address();
    let state = AppState::new(config, store);
    let app = build_app(state);

    // ── Step 3: Bind and serve ───────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!("Attendance server listening on {}", addr);

    // ── Step 4: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Attendance server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
