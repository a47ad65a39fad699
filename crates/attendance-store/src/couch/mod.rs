//! CouchDB document store provider.

pub mod client;
pub mod operations;

pub use client::CouchClient;
pub use operations::CouchDocumentStore;
