//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod pagination;
pub mod params;

pub use auth::{AuthUser, session_id};
pub use json::ValidJson;
pub use pagination::PageParams;
pub use params::{ValidPath, ValidQuery};
