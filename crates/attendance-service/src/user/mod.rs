//! Store account administration.

pub mod admin;

pub use admin::{NewUser, UserAdminService, UserPatch};
