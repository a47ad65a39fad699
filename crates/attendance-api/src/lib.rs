//! # attendance-api
//!
//! HTTP API layer for the attendance tracker built on Axum.
//!
//! Provides the REST endpoints, the signed session cookie, middleware
//! (CORS, compression, security headers, request logging), extractors,
//! DTOs, and the mapping from `AppError` to the JSON envelope.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
