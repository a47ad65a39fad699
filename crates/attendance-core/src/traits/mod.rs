//! Core traits defined in `attendance-core` and implemented by other crates.

pub mod document_store;

pub use document_store::DocumentStore;
