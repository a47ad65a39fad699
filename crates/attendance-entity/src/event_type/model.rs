//! Event type record model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::code::{EVENT_TYPE_ID_PREFIX, EventTypeCode};

/// Document discriminator for event types.
pub const EVENT_TYPE_KIND: &str = "event_type";

/// An event category as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeRecord {
    /// Immutable code.
    pub code: String,
    /// Human-readable label.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Inactive types are hidden from regular listings.
    pub active: bool,
}

impl EventTypeRecord {
    /// Read a record out of a stored document.
    ///
    /// A missing `code` is recovered from the document id, a missing
    /// `name` reads as the code, and only an explicit `active: false`
    /// deactivates.
    pub fn from_document(doc: &Value) -> Option<Self> {
        let code = doc
            .get("code")
            .and_then(Value::as_str)
            .map(String::from)
            .or_else(|| {
                doc.get("_id")
                    .and_then(Value::as_str)
                    .map(|id| id.strip_prefix(EVENT_TYPE_ID_PREFIX).unwrap_or(id).to_string())
            })?;
        let display_name = doc
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .map(String::from)
            .unwrap_or_else(|| code.clone());
        let active = doc.get("active").and_then(Value::as_bool) != Some(false);
        Some(Self {
            code,
            display_name,
            active,
        })
    }

    /// The document for a newly created type.
    pub fn new_document(
        code: &EventTypeCode,
        display_name: Option<&str>,
        active: bool,
        updated_at: &str,
    ) -> Value {
        let name = display_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(code.as_str());
        serde_json::json!({
            "_id": code.document_id(),
            "kind": EVENT_TYPE_KIND,
            "code": code.as_str(),
            "name": name,
            "active": active,
            "updatedAt": updated_at,
        })
    }
}

/// Order records by display name, ignoring case, then by code.
pub fn sort_by_name(records: &mut [EventTypeRecord]) {
    records.sort_by(|a, b| {
        a.display_name
            .to_lowercase()
            .cmp(&b.display_name.to_lowercase())
            .then_with(|| a.code.cmp(&b.code))
    });
}
