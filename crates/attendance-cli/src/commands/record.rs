//! Record a single scan.

use clap::Args;
use serde_json::json;

use attendance_core::error::AppError;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

/// Arguments for the record command
#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Event type code
    #[arg(short = 't', long = "type")]
    pub type_code: String,

    /// Scanned payload
    #[arg(short, long)]
    pub qr_data: String,
}

/// Execute the record command
pub async fn execute(
    args: &RecordArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    let id = client.record(&args.type_code, &args.qr_data).await?;
    match format {
        OutputFormat::Table => output::print_success(&format!("Recorded {}", id)),
        OutputFormat::Json => println!("{}", json!({ "id": id })),
    }
    Ok(())
}
