//! Per-request choice of store credential.
//!
//! User-scoped calls replay the caller's own store token; admin-scoped calls
//! use the configured administrative pair. Neither path holds state between
//! requests; the HTTP connection pool underneath is shared.

pub mod client;

pub use client::ScopedClient;

use std::fmt;
use std::sync::Arc;

use attendance_core::config::StoreConfig;
use attendance_core::error::AppError;
use attendance_core::result::AppResult;
use attendance_core::traits::DocumentStore;
use attendance_core::types::BackendCredential;

use crate::session::ApplicationSession;

/// Which identity a store call runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The logged-in user's own store session.
    User,
    /// The configured administrative credential.
    Admin,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// Builds scoped store clients.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    /// Shared store.
    store: Arc<dyn DocumentStore>,
    /// Primary database name.
    database: String,
    /// Administrative credential, if configured.
    admin: Option<BackendCredential>,
}

impl CredentialResolver {
    /// Create a resolver from store configuration.
    pub fn new(store: Arc<dyn DocumentStore>, config: &StoreConfig) -> Self {
        Self {
            store,
            database: config.database.clone(),
            admin: config.admin_credential(),
        }
    }

    /// Resolve a client for `scope`.
    ///
    /// `User` fails with `Unauthenticated` when there is no session. `Admin`
    /// yields `None` when no administrative credential is configured.
    pub fn resolve(
        &self,
        session: Option<&ApplicationSession>,
        scope: Scope,
    ) -> AppResult<Option<ScopedClient>> {
        match scope {
            Scope::User => {
                let session =
                    session.ok_or_else(|| AppError::unauthenticated("Not authenticated"))?;
                Ok(Some(self.user_client(session)))
            }
            Scope::Admin => Ok(self.admin_client()),
        }
    }

    /// Client carrying the session's store token.
    pub fn user_client(&self, session: &ApplicationSession) -> ScopedClient {
        ScopedClient::new(
            self.store.clone(),
            session.credential.clone(),
            &self.database,
        )
    }

    /// Client carrying the administrative credential, if configured.
    pub fn admin_client(&self) -> Option<ScopedClient> {
        self.admin
            .clone()
            .map(|credential| ScopedClient::new(self.store.clone(), credential, &self.database))
    }

    /// Like [`Self::admin_client`], but absence is an error for features
    /// that cannot degrade.
    pub fn require_admin_client(&self) -> AppResult<ScopedClient> {
        self.admin_client()
            .ok_or_else(|| AppError::feature_unavailable("admin_not_configured"))
    }

    /// Whether an administrative credential is configured.
    pub fn has_admin(&self) -> bool {
        self.admin.is_some()
    }

    /// The shared store, for credential-free calls such as health probes.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Primary database name.
    pub fn database(&self) -> &str {
        &self.database
    }
}
