//! Summary service: database metrics for the dashboard and health probes.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use attendance_auth::CredentialResolver;
use attendance_core::error::AppError;
use attendance_core::result::AppResult;
use attendance_core::traits::DocumentStore;
use attendance_core::types::KeyRange;
use attendance_entity::user::USER_ID_PREFIX;

use crate::context::RequestContext;

/// Dashboard counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub db: String,
    pub size_bytes: u64,
    pub doc_count: u64,
    /// `None` when no administrative credential is available.
    pub users_count: Option<u64>,
    pub online: bool,
    /// Whether the caller could read the primary database.
    pub active: bool,
}

/// Raw database metadata.
#[derive(Debug, Clone, Serialize)]
pub struct DbDetails {
    pub db: String,
    /// Store answer, plus `security` when the admin credential is present.
    pub details: Value,
}

/// Backend reachability for the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub backend: &'static str,
}

/// Aggregates database metadata.
#[derive(Debug, Clone)]
pub struct SummaryService {
    /// Credential resolver.
    resolver: Arc<CredentialResolver>,
}

impl SummaryService {
    /// Creates a new summary service.
    pub fn new(resolver: Arc<CredentialResolver>) -> Self {
        Self { resolver }
    }

    /// Collects the dashboard counters.
    ///
    /// A database the caller cannot read reports `active: false` with zero
    /// counts; only a transport failure fails the whole call.
    pub async fn summary(&self, ctx: &RequestContext) -> AppResult<Summary> {
        let online = self.resolver.store().is_online().await.unwrap_or(false);

        let client = self.resolver.user_client(&ctx.session);
        let (active, size_bytes, doc_count) = match client.info().await {
            Ok(info) => (true, db_size(&info), count_of(&info)),
            Err(e) if e.is_session_rejected() => return Err(e),
            Err(e) if is_transport(&e) => {
                return Err(AppError::backend_unavailable("summary_failed"));
            }
            Err(e) => {
                warn!(db = %client.database(), error = %e, "Database info unavailable to caller");
                (false, 0, 0)
            }
        };

        let users_count = match self.resolver.admin_client() {
            Some(admin) => match admin
                .in_database("_users")
                .all_docs(&KeyRange::prefix(USER_ID_PREFIX, false))
                .await
            {
                Ok(rows) => Some(rows.len() as u64),
                Err(e) => {
                    warn!(error = %e, "Failed to count users");
                    None
                }
            },
            None => None,
        };

        Ok(Summary {
            db: client.database().to_string(),
            size_bytes,
            doc_count,
            users_count,
            online,
            active,
        })
    }

    /// Database metadata, with the security object when an admin
    /// credential is configured.
    pub async fn db_details(&self, ctx: &RequestContext) -> AppResult<DbDetails> {
        let client = self.resolver.user_client(&ctx.session);
        let mut details = client.info().await.map_err(|e| {
            if e.is_session_rejected() {
                e
            } else if is_transport(&e) {
                AppError::backend_unavailable("db_details_failed")
            } else {
                let err = AppError::backend_unavailable("db_info_failed");
                match e.backend_status {
                    Some(status) => err.with_backend_status(status),
                    None => err,
                }
            }
        })?;

        if let Some(admin) = self.resolver.admin_client() {
            match admin.security().await {
                Ok(security) => {
                    if let Some(map) = details.as_object_mut() {
                        map.insert("security".into(), security);
                    }
                }
                Err(e) => warn!(error = %e, "Failed to read security object"),
            }
        }

        Ok(DbDetails {
            db: client.database().to_string(),
            details,
        })
    }

    /// Whether the store answers its health probe.
    pub async fn health(&self) -> HealthReport {
        let up = match self.resolver.store().is_online().await {
            Ok(up) => up,
            Err(e) => {
                warn!(error = %e, "Store health probe failed");
                false
            }
        };
        HealthReport {
            status: "ok",
            backend: if up { "up" } else { "down" },
        }
    }
}

fn is_transport(err: &AppError) -> bool {
    err.is_backend_unavailable() && err.backend_status.is_none()
}

/// On-disk size, preferring `file` then `active` then `external`.
fn db_size(info: &Value) -> u64 {
    let sizes = &info["sizes"];
    ["file", "active", "external"]
        .iter()
        .find_map(|k| sizes.get(*k).and_then(Value::as_u64))
        .unwrap_or(0)
}

fn count_of(info: &Value) -> u64 {
    info.get("doc_count").and_then(Value::as_u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_auth::SessionBridge;
    use attendance_auth::session::MemorySessionRepository;
    use attendance_core::config::{SessionConfig, StoreConfig};
    use attendance_core::error::ErrorKind;
    use attendance_store::memory::MemoryDocumentStore;
    use serde_json::json;

    async fn setup(with_admin: bool) -> (SummaryService, RequestContext, Arc<MemoryDocumentStore>) {
        let store = Arc::new(
            MemoryDocumentStore::new()
                .with_database("attendance")
                .with_admin("admin", "secret")
                .with_user("bob", "pw", &["staff"]),
        );
        let config = StoreConfig {
            url: "memory://".into(),
            admin_user: if with_admin { "admin".into() } else { String::new() },
            admin_password: if with_admin { "secret".into() } else { String::new() },
            ..Default::default()
        };
        let resolver = Arc::new(CredentialResolver::new(store.clone(), &config));
        let bridge = SessionBridge::new(
            store.clone(),
            Arc::new(MemorySessionRepository::new(&SessionConfig::default())),
        );
        let ctx = RequestContext::new(bridge.login("bob", "pw").await.unwrap());
        (SummaryService::new(resolver), ctx, store)
    }

    #[test]
    fn test_size_preference() {
        assert_eq!(db_size(&json!({ "sizes": { "active": 5, "file": 9 } })), 9);
        assert_eq!(db_size(&json!({ "sizes": { "external": 3 } })), 3);
        assert_eq!(db_size(&json!({})), 0);
    }

    #[tokio::test]
    async fn test_summary_with_admin_counts_users() {
        let (service, ctx, _) = setup(true).await;
        let summary = service.summary(&ctx).await.unwrap();
        assert!(summary.online);
        assert!(summary.active);
        assert_eq!(summary.users_count, Some(1));
        assert_eq!(summary.db, "attendance");
    }

    #[tokio::test]
    async fn test_summary_without_admin_reports_null_users() {
        let (service, ctx, _) = setup(false).await;
        let summary = service.summary(&ctx).await.unwrap();
        assert_eq!(summary.users_count, None);
        let body = serde_json::to_value(&summary).unwrap();
        assert_eq!(body["usersCount"], Value::Null);
    }

    #[tokio::test]
    async fn test_db_details_security_only_with_admin() {
        let (service, ctx, _) = setup(true).await;
        let details = service.db_details(&ctx).await.unwrap();
        assert!(details.details.get("security").is_some());

        let (service, ctx, _) = setup(false).await;
        let details = service.db_details(&ctx).await.unwrap();
        assert!(details.details.get("security").is_none());
        assert_eq!(details.details["doc_count"], json!(0));
    }

    #[tokio::test]
    async fn test_revoked_token_fails_summary() {
        let (service, ctx, store) = setup(true).await;
        store.revoke_all_sessions();
        let err = service.summary(&ctx).await.unwrap_err();
        assert!(err.is_session_rejected());
        let err = service.db_details(&ctx).await.unwrap_err();
        assert!(err.is_session_rejected());
    }

    #[tokio::test]
    async fn test_store_down() {
        let (service, ctx, store) = setup(true).await;
        store.set_online(false);
        let err = service.summary(&ctx).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::BackendUnavailable);
        assert_eq!(service.health().await.backend, "down");
    }
}
