//! Application session lifecycle: model, storage and the login bridge.

pub mod bridge;
pub mod model;
pub mod repository;

pub use bridge::SessionBridge;
pub use model::{ApplicationSession, SessionId, SessionState};
pub use repository::{MemorySessionRepository, SessionRepository};
