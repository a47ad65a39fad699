//! Document store trait for pluggable persistence backends.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::credential::{BackendCredential, SessionGrant};
use crate::types::query::{AllDocsRow, FindQuery, FindResponse, KeyRange};

/// Trait for CouchDB-compatible document stores (HTTP or in-memory).
///
/// Every data call names the credential it runs under; implementations
/// hold no per-user state. Failures are already mapped into the
/// application error taxonomy:
///
/// - transport failures and 5xx answers → `BackendUnavailable`
/// - 401 → `Unauthenticated`, 403 → `Forbidden`
/// - 409 → `Conflict`
/// - non-200 `_find` answers → `QueryFailed` with the backend status
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Exchange a username/password for a store session.
    ///
    /// Any rejection (unknown user, wrong password, malformed answer)
    /// yields `InvalidCredentials`.
    async fn open_session(&self, name: &str, password: &str) -> AppResult<SessionGrant>;

    /// Revoke a store session token.
    async fn close_session(&self, token: &str) -> AppResult<()>;

    /// Whether the store reports itself healthy. Needs no credential.
    async fn is_online(&self) -> AppResult<bool>;

    /// Database metadata (`sizes`, `doc_count`, ...).
    async fn database_info(&self, credential: &BackendCredential, db: &str) -> AppResult<Value>;

    /// Database security object.
    async fn security(&self, credential: &BackendCredential, db: &str) -> AppResult<Value>;

    /// Fetch a document, `None` if it does not exist.
    async fn get(
        &self,
        credential: &BackendCredential,
        db: &str,
        id: &str,
    ) -> AppResult<Option<Value>>;

    /// Create or update a document; returns the new revision.
    ///
    /// Updates must carry the current `_rev`; a stale or missing revision
    /// on an existing id is a `Conflict`.
    async fn put(
        &self,
        credential: &BackendCredential,
        db: &str,
        id: &str,
        doc: &Value,
    ) -> AppResult<String>;

    /// Delete a document at a given revision.
    async fn delete(
        &self,
        credential: &BackendCredential,
        db: &str,
        id: &str,
        rev: &str,
    ) -> AppResult<()>;

    /// Run a structured query.
    async fn find(
        &self,
        credential: &BackendCredential,
        db: &str,
        query: &FindQuery,
    ) -> AppResult<FindResponse>;

    /// List documents by id range.
    async fn all_docs(
        &self,
        credential: &BackendCredential,
        db: &str,
        range: &KeyRange,
    ) -> AppResult<Vec<AllDocsRow>>;
}
