//! Role-based access control for administrative routes.

pub mod enforcer;

pub use enforcer::RoleEnforcer;
