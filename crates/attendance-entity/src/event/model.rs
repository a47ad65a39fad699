//! Event record model.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Document discriminator for events.
pub const EVENT_KIND: &str = "event";
/// Id prefix for event documents.
pub const EVENT_ID_PREFIX: &str = "event:";

/// A recorded scan. Immutable once written.
///
/// Field names on the wire follow the stored document shape so the
/// browser UI can consume rows directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Globally unique id (`event:<uuid>`).
    #[serde(rename = "_id")]
    pub id: String,
    /// ISO-8601 creation time; the ordering key.
    #[serde(rename = "ts", default)]
    pub timestamp: String,
    /// Event type code.
    #[serde(rename = "type", default)]
    pub type_code: String,
    /// Free-form scanned payload.
    #[serde(rename = "qrData", default)]
    pub payload: String,
    /// Name of the user who recorded it.
    #[serde(rename = "createdBy", default)]
    pub created_by: String,
}

impl EventRecord {
    /// A new event stamped with a fresh id and the current time.
    pub fn new(
        type_code: impl Into<String>,
        payload: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("{EVENT_ID_PREFIX}{}", Uuid::new_v4()),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            type_code: type_code.into(),
            payload: payload.into(),
            created_by: created_by.into(),
        }
    }

    /// Read a record out of a stored document; `None` if it has no id.
    pub fn from_document(doc: &Value) -> Option<Self> {
        serde_json::from_value(doc.clone()).ok()
    }

    /// The document to persist.
    pub fn to_document(&self) -> Value {
        serde_json::json!({
            "_id": self.id,
            "kind": EVENT_KIND,
            "ts": self.timestamp,
            "type": self.type_code,
            "qrData": self.payload,
            "createdBy": self.created_by,
        })
    }
}

/// Order events by timestamp, newest first.
///
/// ISO-8601 timestamps in a single zone compare correctly as strings.
/// The sort is stable so equal timestamps keep their incoming order.
pub fn sort_newest_first(events: &mut [EventRecord]) {
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_event_shape() {
        let event = EventRecord::new("in", "badge-17", "alice");
        assert!(event.id.starts_with(EVENT_ID_PREFIX));
        assert!(event.timestamp.ends_with('Z'));
        let doc = event.to_document();
        assert_eq!(doc["kind"], json!("event"));
        assert_eq!(doc["qrData"], json!("badge-17"));
    }

    #[test]
    fn test_from_document_tolerates_missing_fields() {
        let event = EventRecord::from_document(&json!({ "_id": "event:1", "kind": "event" }))
            .unwrap();
        assert_eq!(event.timestamp, "");
        assert!(EventRecord::from_document(&json!({ "ts": "x" })).is_none());
    }

    #[test]
    fn test_sort_newest_first() {
        let mut events: Vec<EventRecord> = ["2024-01-02T00:00:00.000Z", "2024-03-01T00:00:00.000Z", "2024-02-01T00:00:00.000Z"]
            .iter()
            .enumerate()
            .map(|(i, ts)| EventRecord {
                id: format!("event:{i}"),
                timestamp: ts.to_string(),
                type_code: "in".into(),
                payload: String::new(),
                created_by: "bob".into(),
            })
            .collect();
        sort_newest_first(&mut events);
        let order: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, vec!["event:1", "event:2", "event:0"]);
    }
}
