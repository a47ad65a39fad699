//! Authorization configuration.

use serde::{Deserialize, Serialize};

/// Role names recognised by the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Role that unlocks user and event-type administration.
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_role: default_admin_role(),
        }
    }
}

fn default_admin_role() -> String {
    "app:admin".to_string()
}
