//! Attendance CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use attendance_core::error::{AppError, ErrorKind};

mod client;
mod commands;
mod navigator;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Diagnostics go to stderr so `--format json` output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&e.message);
            exit_code(&e)
        }
    }
}

/// 2 for rejected credentials or missing rights, 1 for everything else.
fn exit_code(err: &AppError) -> ExitCode {
    match err.kind {
        ErrorKind::InvalidCredentials | ErrorKind::Unauthenticated | ErrorKind::Forbidden => {
            ExitCode::from(2)
        }
        _ => ExitCode::FAILURE,
    }
}
