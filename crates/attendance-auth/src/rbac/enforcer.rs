//! Role enforcement logic: checks whether a session holds a required role.

use attendance_core::config::AuthConfig;
use attendance_core::error::AppError;

use crate::session::ApplicationSession;

/// Role the store grants to its own server administrators.
pub const SERVER_ADMIN_ROLE: &str = "_admin";

/// Enforces role requirements against the roles captured at login.
#[derive(Debug, Clone)]
pub struct RoleEnforcer {
    /// Role that unlocks administration.
    admin_role: String,
}

impl RoleEnforcer {
    /// Creates an enforcer from configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            admin_role: config.admin_role.clone(),
        }
    }

    /// Checks whether the session holds `role`.
    ///
    /// Store server administrators pass every check.
    pub fn has_role(&self, session: &ApplicationSession, role: &str) -> bool {
        session.has_role(role) || session.has_role(SERVER_ADMIN_ROLE)
    }

    /// Returns `Err(Forbidden)` unless the session holds `role`.
    pub fn require_role(&self, session: &ApplicationSession, role: &str) -> Result<(), AppError> {
        if self.has_role(session, role) {
            Ok(())
        } else {
            Err(AppError::forbidden("Forbidden"))
        }
    }

    /// Returns `Err(Forbidden)` unless the session is an application admin.
    pub fn require_admin(&self, session: &ApplicationSession) -> Result<(), AppError> {
        self.require_role(session, &self.admin_role)
    }

    /// Whether the session is an application admin.
    pub fn is_admin(&self, session: &ApplicationSession) -> bool {
        self.has_role(session, &self.admin_role)
    }
}

impl Default for RoleEnforcer {
    fn default() -> Self {
        Self::new(&AuthConfig::default())
    }
}
