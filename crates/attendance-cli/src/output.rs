//! Table and JSON output for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use attendance_entity::{EventRecord, EventTypeRecord};

/// Longest payload shown in a table cell.
const PAYLOAD_WIDTH: usize = 64;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Event display row
#[derive(Debug, Serialize, Tabled)]
pub struct EventRow {
    #[tabled(rename = "time")]
    pub ts: String,
    #[tabled(rename = "type")]
    pub type_code: String,
    #[tabled(rename = "by")]
    pub created_by: String,
    #[tabled(rename = "payload")]
    pub payload: String,
}

impl From<&EventRecord> for EventRow {
    fn from(e: &EventRecord) -> Self {
        Self {
            ts: e.timestamp.clone(),
            type_code: e.type_code.clone(),
            created_by: e.created_by.clone(),
            payload: truncate(&e.payload, PAYLOAD_WIDTH),
        }
    }
}

/// Event type display row
#[derive(Debug, Serialize, Tabled)]
pub struct TypeRow {
    pub code: String,
    pub name: String,
    pub active: bool,
}

impl From<&EventTypeRecord> for TypeRow {
    fn from(t: &EventTypeRecord) -> Self {
        Self {
            code: t.code.clone(),
            name: t.display_name.clone(),
            active: t.active,
        }
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<12} {}", format!("{}:", key), value);
}

/// Cut `s` to at most `max` characters, marking the cut with an ellipsis.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
