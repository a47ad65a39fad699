//! List the active event types.

use attendance_core::error::AppError;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat, TypeRow};

/// Execute the types command
pub async fn execute(client: &ApiClient, format: OutputFormat) -> Result<(), AppError> {
    let types = client.event_types().await?;
    let rows: Vec<TypeRow> = types.iter().map(TypeRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}
