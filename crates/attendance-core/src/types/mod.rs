//! Core type definitions shared across the attendance workspace.

pub mod credential;
pub mod pagination;
pub mod query;

pub use credential::{BackendCredential, SessionGrant};
pub use pagination::{Page, PageCursor, PageLimit};
pub use query::{AllDocsRow, FindQuery, FindResponse, KeyRange, SortDirection, SortField};
