//! Cursor pagination query parameters.

use serde::{Deserialize, Serialize};

use attendance_core::types::{PageCursor, PageLimit};

/// `limit` and `bookmark` as the client sent them.
///
/// Both stay raw strings so that an unparseable limit falls back to the
/// default instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageParams {
    /// Requested page size.
    pub limit: Option<String>,
    /// Opaque cursor from the previous page.
    pub bookmark: Option<String>,
}

impl PageParams {
    /// The page size, clamped to the allowed range.
    pub fn limit(&self) -> PageLimit {
        PageLimit::parse(self.limit.as_deref())
    }

    /// The cursor, when a non-empty one was sent.
    pub fn cursor(&self) -> Option<PageCursor> {
        self.bookmark.clone().and_then(PageCursor::from_raw)
    }
}
