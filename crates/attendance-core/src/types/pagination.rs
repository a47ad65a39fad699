//! Page size and continuation types for cursor-paginated listings.

use serde::{Deserialize, Deserializer, Serialize};

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u32 = 25;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A page size guaranteed to lie in `[1, MAX_PAGE_SIZE]`.
///
/// Deserialization goes through [`PageLimit::clamped`], so no wire value
/// can produce an out-of-range limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageLimit(u32);

impl PageLimit {
    /// Clamp an arbitrary signed value into range.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(1, MAX_PAGE_SIZE as i64) as u32)
    }

    /// Parse a raw query-string value.
    ///
    /// Only the leading integer is read, so `"12abc"` is 12 and `"1.5"`
    /// is 1. Missing, non-numeric and zero values fall back to the default
    /// page size; everything else is clamped.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.and_then(leading_integer) {
            Some(0) | None => Self::default(),
            Some(n) => Self::clamped(n),
        }
    }

    /// The numeric limit.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl<'de> Deserialize<'de> for PageLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::clamped)
    }
}

/// Optional sign followed by decimal digits, after leading whitespace.
/// Digits beyond `i64` saturate.
fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude = digits[..end]
        .bytes()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    Some(if negative { -magnitude } else { magnitude })
}

impl Default for PageLimit {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

/// Opaque continuation token returned by the store's query engine.
///
/// Only meaningful as input to the next query with the identical
/// selector and sort; never decoded or compared by callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    /// Wrap a raw token. Blank tokens mean "no cursor".
    pub fn from_raw(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PageCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of results plus the cursor for the following page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows on this page, in display order.
    pub rows: Vec<T>,
    /// Cursor for the next page; absent on the final page.
    pub next_cursor: Option<PageCursor>,
}

impl<T> Page<T> {
    /// An empty final page.
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            next_cursor: None,
        }
    }

    /// Whether a following page exists.
    pub fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }
}
