//! Response DTOs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use attendance_auth::ApplicationSession;
use attendance_service::BadgeQr;
use attendance_service::qr::{BADGE_MIME, BadgePayload};
use attendance_core::types::Page;

/// Standard success wrapper: `{ "ok": true, ...data }`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true`.
    pub ok: bool,
    /// Response payload, flattened into the envelope.
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self { ok: true, data }
    }
}

/// Body of a bare acknowledgement.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// `{ "ok": true }`.
    pub fn done() -> Self {
        Self::ok(Empty {})
    }
}

/// The signed-in user as the browser sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub name: String,
    pub roles: BTreeSet<String>,
}

impl From<&ApplicationSession> for SessionUser {
    fn from(session: &ApplicationSession) -> Self {
        Self {
            name: session.user_name.clone(),
            roles: session.roles.clone(),
        }
    }
}

/// Wraps the signed-in user.
#[derive(Debug, Clone, Serialize)]
pub struct UserEnvelope {
    pub user: SessionUser,
}

/// A listing.
#[derive(Debug, Clone, Serialize)]
pub struct Rows<T: Serialize> {
    pub rows: Vec<T>,
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Serialize)]
pub struct CursorPage<T: Serialize> {
    pub rows: Vec<T>,
    /// Cursor for the next page; `null` on the last page.
    pub bookmark: Option<String>,
}

impl<T: Serialize> From<Page<T>> for CursorPage<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            rows: page.rows,
            bookmark: page.next_cursor.map(|c| c.as_str().to_string()),
        }
    }
}

/// Id of a created document.
#[derive(Debug, Clone, Serialize)]
pub struct Created {
    pub id: String,
}

/// Health probe answer.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// `up` or `down`.
    pub backend: String,
}

/// A rendered badge QR code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrImage {
    pub filename: String,
    pub mime: &'static str,
    /// Length of `data_url`, for clients deciding how to offer the download.
    pub size_hint: usize,
    pub payload: BadgePayload,
    pub data_url: String,
}

impl From<BadgeQr> for QrImage {
    fn from(qr: BadgeQr) -> Self {
        Self {
            filename: qr.filename,
            mime: BADGE_MIME,
            size_hint: qr.data_url.len(),
            payload: qr.payload,
            data_url: qr.data_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_core::types::PageCursor;
    use serde_json::json;

    #[test]
    fn test_envelope_flattens_payload() {
        let body = serde_json::to_value(ApiResponse::ok(Created { id: "event:1".into() })).unwrap();
        assert_eq!(body, json!({ "ok": true, "id": "event:1" }));
        assert_eq!(serde_json::to_value(ApiResponse::done()).unwrap(), json!({ "ok": true }));
    }

    #[test]
    fn test_last_page_has_null_bookmark() {
        let last: CursorPage<u8> = Page { rows: vec![1], next_cursor: None }.into();
        assert_eq!(
            serde_json::to_value(ApiResponse::ok(last)).unwrap(),
            json!({ "ok": true, "rows": [1], "bookmark": null })
        );

        let more: CursorPage<u8> = Page {
            rows: vec![1, 2],
            next_cursor: PageCursor::from_raw("g1AAA"),
        }
        .into();
        assert_eq!(more.bookmark.as_deref(), Some("g1AAA"));
    }
}

