//! Application state shared across all handlers and middleware.

use std::fmt;
use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use attendance_auth::{
    CredentialResolver, MemorySessionRepository, RoleEnforcer, SessionBridge, SessionRepository,
};
use attendance_core::config::AppConfig;
use attendance_core::traits::DocumentStore;
use attendance_service::{
    EventService, EventTypeService, QrService, SummaryService, UserAdminService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Document store (CouchDB or in-memory)
    pub store: Arc<dyn DocumentStore>,
    /// Application session repository
    pub sessions: Arc<dyn SessionRepository>,
    /// Signing key for the session cookie
    pub cookie_key: Key,

    // ── Auth ─────────────────────────────────────────────────
    /// Login/logout bridge to store sessions
    pub bridge: Arc<SessionBridge>,
    /// Per-request store credential selection
    pub resolver: Arc<CredentialResolver>,
    /// Role guard
    pub roles: Arc<RoleEnforcer>,

    // ── Services ─────────────────────────────────────────────
    /// Event recording and listing
    pub event_service: Arc<EventService>,
    /// Event type catalogue
    pub event_type_service: Arc<EventTypeService>,
    /// Account administration
    pub user_service: Arc<UserAdminService>,
    /// Dashboard metrics and health
    pub summary_service: Arc<SummaryService>,
    /// Badge QR rendering
    pub qr_service: Arc<QrService>,
}

impl AppState {
    /// Wires every service over `store`, keeping sessions in memory.
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        let sessions: Arc<dyn SessionRepository> =
            Arc::new(MemorySessionRepository::new(&config.session));
        Self::with_sessions(config, store, sessions)
    }

    /// Wires every service over `store` and an injected session repository.
    pub fn with_sessions(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        let cookie_key = derive_cookie_key(&config.session.secret);
        let bridge = Arc::new(SessionBridge::new(store.clone(), sessions.clone()));
        let resolver = Arc::new(CredentialResolver::new(store.clone(), &config.store));
        let roles = Arc::new(RoleEnforcer::new(&config.auth));

        Self {
            event_service: Arc::new(EventService::new(resolver.clone())),
            event_type_service: Arc::new(EventTypeService::new(resolver.clone(), roles.clone())),
            user_service: Arc::new(UserAdminService::new(resolver.clone(), roles.clone())),
            summary_service: Arc::new(SummaryService::new(resolver.clone())),
            qr_service: Arc::new(QrService::new(roles.clone())),
            config: Arc::new(config),
            store,
            sessions,
            cookie_key,
            bridge,
            resolver,
            roles,
        }
    }

    /// Name of the session cookie.
    pub fn cookie_name(&self) -> &str {
        &self.config.session.cookie_name
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Stretch the configured secret to the 64 bytes a signing key needs.
fn derive_cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}
