//! A store handle bound to one credential and one database.

use std::sync::Arc;

use serde_json::Value;

use attendance_core::error::AppError;
use attendance_core::result::AppResult;
use attendance_core::traits::DocumentStore;
use attendance_core::types::{AllDocsRow, BackendCredential, FindQuery, FindResponse, KeyRange};

/// Stateless client descriptor produced per request.
#[derive(Debug, Clone)]
pub struct ScopedClient {
    store: Arc<dyn DocumentStore>,
    credential: BackendCredential,
    database: String,
}

impl ScopedClient {
    /// Bind `credential` to `database`.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        credential: BackendCredential,
        database: impl Into<String>,
    ) -> Self {
        Self {
            store,
            credential,
            database: database.into(),
        }
    }

    /// The same credential against another database.
    pub fn in_database(&self, database: impl Into<String>) -> Self {
        Self {
            store: self.store.clone(),
            credential: self.credential.clone(),
            database: database.into(),
        }
    }

    pub fn credential(&self) -> &BackendCredential {
        &self.credential
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub async fn info(&self) -> AppResult<Value> {
        self.store
            .database_info(&self.credential, &self.database)
            .await
            .map_err(|e| self.scoped(e))
    }

    pub async fn security(&self) -> AppResult<Value> {
        self.store
            .security(&self.credential, &self.database)
            .await
            .map_err(|e| self.scoped(e))
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<Value>> {
        self.store
            .get(&self.credential, &self.database, id)
            .await
            .map_err(|e| self.scoped(e))
    }

    pub async fn put(&self, id: &str, doc: &Value) -> AppResult<String> {
        self.store
            .put(&self.credential, &self.database, id, doc)
            .await
            .map_err(|e| self.scoped(e))
    }

    pub async fn delete(&self, id: &str, rev: &str) -> AppResult<()> {
        self.store
            .delete(&self.credential, &self.database, id, rev)
            .await
            .map_err(|e| self.scoped(e))
    }

    pub async fn find(&self, query: &FindQuery) -> AppResult<FindResponse> {
        self.store
            .find(&self.credential, &self.database, query)
            .await
            .map_err(|e| self.scoped(e))
    }

    pub async fn all_docs(&self, range: &KeyRange) -> AppResult<Vec<AllDocsRow>> {
        self.store
            .all_docs(&self.credential, &self.database, range)
            .await
            .map_err(|e| self.scoped(e))
    }

    /// A 401 only ends the caller's session when it was the caller's token
    /// that the store refused. A refused admin pair is a server fault.
    fn scoped(&self, err: AppError) -> AppError {
        match &self.credential {
            BackendCredential::Basic { .. } if err.is_session_rejected() => {
                AppError::backend_unavailable("admin credentials rejected by store")
                    .with_backend_status(401)
            }
            _ => err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_core::error::ErrorKind;
    use attendance_store::memory::MemoryDocumentStore;

    fn store() -> Arc<MemoryDocumentStore> {
        Arc::new(
            MemoryDocumentStore::new()
                .with_database("attendance")
                .with_admin("admin", "secret"),
        )
    }

    #[tokio::test]
    async fn test_stale_token_is_session_rejection() {
        let client = ScopedClient::new(
            store(),
            BackendCredential::SessionToken {
                token: "expired".into(),
            },
            "attendance",
        );
        let err = client.info().await.unwrap_err();
        assert!(err.is_session_rejected());
    }

    #[tokio::test]
    async fn test_wrong_admin_pair_is_not_session_rejection() {
        let client = ScopedClient::new(
            store(),
            BackendCredential::basic("admin", "wrong"),
            "attendance",
        );
        let err = client.info().await.unwrap_err();
        assert!(!err.is_session_rejected());
        assert_eq!(err.kind, ErrorKind::BackendUnavailable);
        assert_eq!(err.backend_status, Some(401));
    }
}
