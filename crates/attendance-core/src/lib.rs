//! # attendance-core
//!
//! Core crate for the attendance tracker. Contains configuration schemas,
//! the document-store trait, backend credential and query types, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other attendance crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
