//! Structured query types for the store's `_find` and `_all_docs` APIs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::pagination::{PageCursor, PageLimit};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// A sort specification consisting of a field name and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    /// Document field to sort by.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortField {
    /// Ascending sort on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// A `_find` request: selector, optional sort, limit, optional cursor.
#[derive(Debug, Clone)]
pub struct FindQuery {
    /// Mango selector.
    pub selector: Map<String, Value>,
    /// Sort order; `None` lets the store pick its natural order.
    pub sort: Option<Vec<SortField>>,
    /// Page size.
    pub limit: PageLimit,
    /// Continuation cursor from the previous page.
    pub bookmark: Option<PageCursor>,
    /// Projection; `None` returns whole documents.
    pub fields: Option<Vec<String>>,
}

impl FindQuery {
    /// A query over `selector` with default limit and no sort.
    pub fn new(selector: Map<String, Value>) -> Self {
        Self {
            selector,
            sort: None,
            limit: PageLimit::default(),
            bookmark: None,
            fields: None,
        }
    }

    /// Set the sort order.
    pub fn sorted_by(mut self, sort: Vec<SortField>) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the page size.
    pub fn with_limit(mut self, limit: PageLimit) -> Self {
        self.limit = limit;
        self
    }

    /// Resume after `bookmark`.
    pub fn with_bookmark(mut self, bookmark: Option<PageCursor>) -> Self {
        self.bookmark = bookmark;
        self
    }

    /// Restrict returned fields.
    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// The same query with the sort removed.
    pub fn without_sort(&self) -> Self {
        Self {
            sort: None,
            ..self.clone()
        }
    }

    /// Render the JSON body the store expects.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("selector".into(), Value::Object(self.selector.clone()));
        body.insert("limit".into(), Value::from(self.limit.get()));
        if let Some(sort) = &self.sort {
            let spec = sort
                .iter()
                .map(|s| {
                    let dir = match s.direction {
                        SortDirection::Asc => "asc",
                        SortDirection::Desc => "desc",
                    };
                    let mut entry = Map::new();
                    entry.insert(s.field.clone(), Value::from(dir));
                    Value::Object(entry)
                })
                .collect();
            body.insert("sort".into(), Value::Array(spec));
        }
        if let Some(bookmark) = &self.bookmark {
            body.insert("bookmark".into(), Value::from(bookmark.as_str()));
        }
        if let Some(fields) = &self.fields {
            body.insert("fields".into(), Value::from(fields.clone()));
        }
        Value::Object(body)
    }
}

/// The store's answer to a `_find` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindResponse {
    /// Matching documents.
    #[serde(default)]
    pub docs: Vec<Value>,
    /// Continuation token for the next page.
    #[serde(default)]
    pub bookmark: Option<String>,
    /// Advisory warning, e.g. "no matching index found".
    #[serde(default)]
    pub warning: Option<String>,
}

/// Key range for `_all_docs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRange {
    /// Inclusive start key.
    pub start_key: String,
    /// Inclusive end key.
    pub end_key: String,
    /// Whether to return full documents.
    pub include_docs: bool,
}

impl KeyRange {
    /// All ids beginning with `prefix`.
    pub fn prefix(prefix: &str, include_docs: bool) -> Self {
        Self {
            start_key: prefix.to_string(),
            end_key: format!("{prefix}\u{fff0}"),
            include_docs,
        }
    }

    /// Whether `id` falls inside the range.
    pub fn contains(&self, id: &str) -> bool {
        id >= self.start_key.as_str() && id <= self.end_key.as_str()
    }
}

/// One row of an `_all_docs` answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllDocsRow {
    /// Document id.
    pub id: String,
    /// Full document when `include_docs` was requested.
    #[serde(default)]
    pub doc: Option<Value>,
}
