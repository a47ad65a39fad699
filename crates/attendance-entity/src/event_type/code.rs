//! Validated event type codes.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use attendance_core::error::AppError;

static CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9._-]+$").expect("event type code pattern is valid")
});

/// Id prefix for event type documents.
pub const EVENT_TYPE_ID_PREFIX: &str = "eventtype:";

/// An event type code: letters, digits, `.`, `_`, `-`.
///
/// Acts as the primary key and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventTypeCode(String);

impl EventTypeCode {
    /// Validate a raw code, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let code = raw.trim();
        if code.is_empty() || !CODE_PATTERN.is_match(code) {
            return Err(AppError::validation("Invalid code"));
        }
        Ok(Self(code.to_string()))
    }

    /// The code as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id of the document holding this type.
    pub fn document_id(&self) -> String {
        format!("{EVENT_TYPE_ID_PREFIX}{}", self.0)
    }
}

impl std::fmt::Display for EventTypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
