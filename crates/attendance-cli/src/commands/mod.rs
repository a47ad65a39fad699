//! CLI command definitions and dispatch.

pub mod browse;
pub mod record;
pub mod types;

use clap::{Parser, Subcommand};

use attendance_core::error::AppError;

use crate::client::ApiClient;
use crate::output::OutputFormat;

/// Attendance tracker command-line client
#[derive(Debug, Parser)]
#[command(name = "attendance", version, about, long_about = None)]
pub struct Cli {
    /// Server base URL
    #[arg(short, long, env = "ATTENDANCE_SERVER", default_value = "http://127.0.0.1:3000")]
    pub server: String,

    /// Account name; prompted for when absent
    #[arg(short, long, env = "ATTENDANCE_USER")]
    pub user: Option<String>,

    /// Account password; prompted for when absent
    #[arg(long, env = "ATTENDANCE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Page through recorded events
    Browse(browse::BrowseArgs),
    /// Record a scan
    Record(record::RecordArgs),
    /// List active event types
    Types,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let mut client = self.connect().await?;
        let result = match &self.command {
            Commands::Browse(args) => browse::execute(args, &client, self.format).await,
            Commands::Record(args) => record::execute(args, &client, self.format).await,
            Commands::Types => types::execute(&client, self.format).await,
        };

        if let Err(e) = client.logout().await {
            tracing::warn!(error = %e, "Logout failed");
        }
        result
    }

    /// Log in, prompting for whatever credentials were not given.
    async fn connect(&self) -> Result<ApiClient, AppError> {
        let username = match &self.user {
            Some(u) => u.clone(),
            None => dialoguer::Input::new()
                .with_prompt("Username")
                .interact_text()
                .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
        };
        let password = match &self.password {
            Some(p) => p.clone(),
            None => dialoguer::Password::new()
                .with_prompt("Password")
                .interact()
                .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
        };

        let mut client = ApiClient::new(&self.server)?;
        let user = client.login(&username, &password).await?;
        tracing::info!(user = %user.name, roles = ?user.roles, "Logged in");
        Ok(client)
    }
}
