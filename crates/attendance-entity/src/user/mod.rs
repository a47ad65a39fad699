//! Store-managed user accounts.

pub mod model;

pub use model::{USER_ID_PREFIX, UserProfile, user_document_id};
