//! # attendance-store
//!
//! Document store implementations for the attendance tracker:
//!
//! - **couch**: CouchDB-compatible HTTP API via [reqwest](https://crates.io/crates/reqwest)
//! - **memory**: in-process store for development and tests
//!
//! The provider is selected at runtime from the configured store URL.

#[cfg(feature = "couch")]
pub mod couch;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;

pub use provider::connect;
