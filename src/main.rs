//! Attendance Server
//!
//! Main entry point that loads configuration, connects the document store
//! and starts the HTTP API.

use tracing_subscriber::{EnvFilter, fmt};

use attendance_core::config::{AppConfig, LogFormat};
use attendance_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and `ATTENDANCE__*` variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("ATTENDANCE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(mut config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting attendance server v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Session secret ───────────────────────────────────
    if config.session.secret.trim().is_empty() {
        tracing::warn!("No session secret configured; sessions will not survive a restart");
        config.session.secret = uuid::Uuid::new_v4().to_string();
    }

    // ── Step 2: Connect the document store ───────────────────────
    tracing::info!(
        database = %config.store.database,
        "Connecting to document store..."
    );
    let store = attendance_store::connect(&config.store)?;

    // ── Step 3: Serve until shutdown ─────────────────────────────
    attendance_api::app::run_server(config, store).await
}
