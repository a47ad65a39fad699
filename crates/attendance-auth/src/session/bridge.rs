//! Login/logout bridge between application sessions and store sessions.

use std::sync::Arc;

use tracing::{info, warn};

use attendance_core::error::AppError;
use attendance_core::result::AppResult;
use attendance_core::traits::DocumentStore;

use super::model::{ApplicationSession, SessionId, SessionState};
use super::repository::SessionRepository;

/// Exchanges user credentials for a store session and tracks it.
#[derive(Debug, Clone)]
pub struct SessionBridge {
    /// Store that issues and revokes native sessions.
    store: Arc<dyn DocumentStore>,
    /// Where application sessions live.
    sessions: Arc<dyn SessionRepository>,
}

impl SessionBridge {
    /// Creates a new bridge.
    pub fn new(store: Arc<dyn DocumentStore>, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { store, sessions }
    }

    /// Performs the login flow:
    ///
    /// 1. Reject blank input
    /// 2. Open a native store session
    /// 3. Persist an application session carrying the store token
    ///
    /// Unknown user and wrong password both surface as `InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<ApplicationSession> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::validation("Missing credentials"));
        }

        info!(user = %username, state = %SessionState::Authenticating, "Processing login");

        let grant = match self.store.open_session(username, password).await {
            Ok(grant) => grant,
            Err(e) => {
                warn!(user = %username, kind = %e.kind, "Login failed");
                return Err(e);
            }
        };
        if grant.token.is_empty() {
            warn!(user = %username, "Store issued an empty session token");
            return Err(AppError::invalid_credentials("Invalid credentials"));
        }

        let session = ApplicationSession::from_grant(grant);
        self.sessions.set(session.clone()).await?;

        info!(
            user = %session.user_name,
            session_id = %session.id,
            roles = ?session.roles,
            state = %SessionState::Authenticated,
            "Login successful"
        );
        Ok(session)
    }

    /// Performs the logout flow:
    ///
    /// 1. Revoke the store token (failures are logged only)
    /// 2. Destroy the application session
    ///
    /// Always succeeds, including for unknown ids.
    pub async fn logout(&self, id: &SessionId) {
        let session = match self.sessions.get(id).await {
            Ok(session) => session,
            Err(e) => {
                warn!(session_id = %id, error = %e, "Failed to load session during logout");
                None
            }
        };

        if let Some(token) = session.as_ref().and_then(|s| s.backend_token()) {
            if let Err(e) = self.store.close_session(token).await {
                warn!(session_id = %id, error = %e, "Failed to revoke store session");
            }
        }

        if let Err(e) = self.sessions.destroy(id).await {
            warn!(session_id = %id, error = %e, "Failed to destroy session");
        }

        info!(
            user = session.as_ref().map(|s| s.user_name.as_str()).unwrap_or("-"),
            session_id = %id,
            state = %SessionState::Destroyed,
            "Logout completed"
        );
    }

    /// Drop an application session whose store token the store no longer
    /// accepts. Nothing is revoked since the token is already dead.
    pub async fn expire(&self, id: &SessionId) {
        if let Err(e) = self.sessions.destroy(id).await {
            warn!(session_id = %id, error = %e, "Failed to destroy expired session");
        }
        info!(
            session_id = %id,
            state = %SessionState::Destroyed,
            "Session expired by store"
        );
    }

    /// Load the session behind a cookie value.
    pub async fn current(&self, id: &SessionId) -> AppResult<Option<ApplicationSession>> {
        self.sessions.get(id).await
    }

    /// Where the session behind `id` stands.
    pub async fn state(&self, id: Option<&SessionId>) -> AppResult<SessionState> {
        let Some(id) = id else {
            return Ok(SessionState::Anonymous);
        };
        Ok(match self.sessions.get(id).await? {
            Some(_) => SessionState::Authenticated,
            None => SessionState::Anonymous,
        })
    }
}
