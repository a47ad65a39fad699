//! Scan events.

pub mod model;

pub use model::{EventRecord, sort_newest_first};
