//! Administrator-managed event categories.

pub mod code;
pub mod model;

pub use code::EventTypeCode;
pub use model::{EventTypeRecord, sort_by_name};
