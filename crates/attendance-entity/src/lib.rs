//! # attendance-entity
//!
//! Domain records for the attendance tracker. Each record knows how to
//! read itself out of, and write itself into, the JSON document shape the
//! store persists.

pub mod event;
pub mod event_type;
pub mod user;

pub use event::EventRecord;
pub use event_type::{EventTypeCode, EventTypeRecord};
pub use user::UserProfile;
