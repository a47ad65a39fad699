//! In-memory document store provider.

pub mod store;

pub use store::{MemoryDocumentStore, USERS_DB};
