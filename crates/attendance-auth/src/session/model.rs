//! Application session model.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use attendance_core::types::{BackendCredential, SessionGrant};

/// Opaque identifier of an application session (the cookie value).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap a raw identifier read back from a cookie.
    pub fn from_raw(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() { None } else { Some(Self(raw)) }
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Enough to correlate log lines, not enough to replay.
        let shown: String = self.0.chars().take(8).collect();
        write!(f, "{shown}…")
    }
}

/// Where an application session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session cookie, or one the repository does not know.
    Anonymous,
    /// Credentials are being exchanged with the store.
    Authenticating,
    /// A live session holding a store token.
    Authenticated,
    /// Logged out; the store token has been revoked.
    Destroyed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::Authenticating => write!(f, "authenticating"),
            Self::Authenticated => write!(f, "authenticated"),
            Self::Destroyed => write!(f, "destroyed"),
        }
    }
}

/// A browser-facing session bound to a store credential.
///
/// The store credential lives exactly as long as this value does; both are
/// dropped together at logout or expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSession {
    /// Session identifier.
    pub id: SessionId,
    /// Canonical user name reported by the store.
    pub user_name: String,
    /// Roles captured at login.
    pub roles: BTreeSet<String>,
    /// Credential forwarded on user-scoped store calls.
    pub credential: BackendCredential,
    /// Login time.
    pub created_at: DateTime<Utc>,
}

impl ApplicationSession {
    /// Build a session from a successful store login.
    pub fn from_grant(grant: SessionGrant) -> Self {
        Self {
            id: SessionId::generate(),
            user_name: grant.name,
            roles: grant.roles.into_iter().collect(),
            credential: BackendCredential::session_token(grant.token),
            created_at: Utc::now(),
        }
    }

    /// Whether the session carries `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// The store token, when the credential is one.
    pub fn backend_token(&self) -> Option<&str> {
        match &self.credential {
            BackendCredential::SessionToken { token } => Some(token),
            BackendCredential::Basic { .. } => None,
        }
    }
}
