//! Scan event recording and listing.

pub mod service;

pub use service::{EventFilter, EventService};
