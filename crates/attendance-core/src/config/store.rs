//! Document store connection configuration.

use serde::{Deserialize, Serialize};

use crate::types::credential::BackendCredential;

/// Connection settings for the CouchDB-compatible document store.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the store.
    #[serde(default = "default_url")]
    pub url: String,
    /// Primary database holding events and event types.
    #[serde(default = "default_database")]
    pub database: String,
    /// Administrative username; blank disables admin-scoped features.
    #[serde(default)]
    pub admin_user: String,
    /// Administrative password.
    #[serde(default)]
    pub admin_password: String,
    /// Per-call network timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl StoreConfig {
    /// The administrative credential, when both halves are configured.
    pub fn admin_credential(&self) -> Option<BackendCredential> {
        if self.admin_user.is_empty() || self.admin_password.is_empty() {
            return None;
        }
        Some(BackendCredential::basic(
            self.admin_user.clone(),
            self.admin_password.clone(),
        ))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            database: default_database(),
            admin_user: String::new(),
            admin_password: String::new(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("database", &self.database)
            .field("admin_user", &self.admin_user)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

fn default_url() -> String {
    "http://127.0.0.1:5984".to_string()
}

fn default_database() -> String {
    "attendance".to_string()
}

fn default_request_timeout() -> u64 {
    15
}
