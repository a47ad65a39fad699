//! Credentials presented to the document store.

use serde::{Deserialize, Serialize};

/// The credential a backend call is made with.
///
/// Either the opaque session token the store issued to an end user at
/// login, or the fixed administrative username/password pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendCredential {
    /// The store's own session token (the `AuthSession` cookie value).
    SessionToken {
        /// Opaque token value.
        token: String,
    },
    /// HTTP basic credentials.
    Basic {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
}

impl BackendCredential {
    /// Wrap a store-issued session token.
    pub fn session_token(token: impl Into<String>) -> Self {
        Self::SessionToken {
            token: token.into(),
        }
    }

    /// Build a basic credential pair.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Whether this is the administrative (basic) credential.
    pub fn is_basic(&self) -> bool {
        matches!(self, Self::Basic { .. })
    }
}

impl std::fmt::Debug for BackendCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionToken { .. } => f.write_str("SessionToken(..)"),
            Self::Basic { username, .. } => {
                f.debug_struct("Basic").field("username", username).finish()
            }
        }
    }
}

/// What the store hands back after a successful native login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGrant {
    /// Canonical user name as reported by the store.
    pub name: String,
    /// Roles asserted by the store at login time.
    pub roles: Vec<String>,
    /// Session token to replay on subsequent calls.
    pub token: String,
}
