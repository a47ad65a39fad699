//! Application session configuration.

use serde::{Deserialize, Serialize};

/// Browser-facing session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Secret used to sign the session cookie. Blank means "generate one
    /// per process", which invalidates sessions on restart.
    #[serde(default)]
    pub secret: String,
    /// Fixed session lifetime in hours.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Whether the cookie is flagged `Secure`.
    #[serde(default)]
    pub secure_cookie: bool,
    /// Upper bound on concurrently held sessions in memory.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl_hours: default_ttl_hours(),
            cookie_name: default_cookie_name(),
            secure_cookie: false,
            max_capacity: default_max_capacity(),
        }
    }
}

fn default_ttl_hours() -> u64 {
    8
}

fn default_cookie_name() -> String {
    "sid".to_string()
}

fn default_max_capacity() -> u64 {
    10_000
}
