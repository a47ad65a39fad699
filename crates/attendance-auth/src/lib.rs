//! # attendance-auth
//!
//! Identity plumbing between the browser-facing application and the
//! document store.
//!
//! ## Modules
//!
//! - `session`: application sessions, the session repository and the
//!   login/logout bridge to the store's native sessions
//! - `resolver`: per-request selection of the user or admin store credential
//! - `rbac`: role checks for administrative routes

pub mod rbac;
pub mod resolver;
pub mod session;

pub use rbac::RoleEnforcer;
pub use resolver::{CredentialResolver, Scope, ScopedClient};
pub use session::{
    ApplicationSession, MemorySessionRepository, SessionBridge, SessionId, SessionRepository,
    SessionState,
};
