//! Event type catalogue management.

pub mod service;

pub use service::{EventTypePatch, EventTypeService, NewEventType};
