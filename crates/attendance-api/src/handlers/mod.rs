//! Route handlers organized by domain.

pub mod auth;
pub mod event;
pub mod event_type;
pub mod health;
pub mod qr;
pub mod summary;
pub mod user;
