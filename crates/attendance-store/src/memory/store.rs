//! In-process document store that mimics the CouchDB HTTP semantics.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dashmap::DashMap;
use serde_json::{Map, Value, json};
use tracing::debug;

use attendance_core::error::AppError;
use attendance_core::result::AppResult;
use attendance_core::traits::DocumentStore;
use attendance_core::types::{
    AllDocsRow, BackendCredential, FindQuery, FindResponse, KeyRange, SessionGrant, SortDirection,
};

/// The store's built-in account database.
pub const USERS_DB: &str = "_users";

const USER_DOC_PREFIX: &str = "org.couchdb.user:";
const SERVER_ADMIN_ROLE: &str = "_admin";

/// Who a credential resolved to.
#[derive(Debug, Clone)]
struct Identity {
    name: String,
    admin: bool,
}

/// In-memory document store.
///
/// Databases are `BTreeMap`s keyed by `_id`, so unsorted queries come back
/// in id order like the real server's primary index. Clones share state.
#[derive(Debug, Clone)]
pub struct MemoryDocumentStore {
    /// Database name → documents by id.
    databases: Arc<DashMap<String, BTreeMap<String, Value>>>,
    /// Login name → password.
    passwords: Arc<DashMap<String, String>>,
    /// Session token → login name.
    sessions: Arc<DashMap<String, String>>,
    /// Server admin pair.
    admin: Option<(String, String)>,
    /// Whether sorted `_find` requests have a usable index.
    sort_index: Arc<AtomicBool>,
    /// Whether the store answers at all.
    online: Arc<AtomicBool>,
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocumentStore {
    /// An empty store holding only the account database.
    pub fn new() -> Self {
        let databases = DashMap::new();
        databases.insert(USERS_DB.to_string(), BTreeMap::new());
        Self {
            databases: Arc::new(databases),
            passwords: Arc::new(DashMap::new()),
            sessions: Arc::new(DashMap::new()),
            admin: None,
            sort_index: Arc::new(AtomicBool::new(true)),
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Create an empty database.
    pub fn with_database(self, name: &str) -> Self {
        self.databases.entry(name.to_string()).or_default();
        self
    }

    /// Configure the server admin pair.
    pub fn with_admin(mut self, name: &str, password: &str) -> Self {
        self.admin = Some((name.to_string(), password.to_string()));
        self
    }

    /// Seed an account.
    pub fn with_user(self, name: &str, password: &str, roles: &[&str]) -> Self {
        let id = format!("{USER_DOC_PREFIX}{name}");
        let doc = json!({
            "_id": id,
            "_rev": next_rev(None),
            "type": "user",
            "name": name,
            "roles": roles,
        });
        if let Some(mut users) = self.databases.get_mut(USERS_DB) {
            users.insert(id, doc);
        }
        self.passwords.insert(name.to_string(), password.to_string());
        self
    }

    /// Reject every sorted query, as a server with no matching index does.
    pub fn without_sort_index(self) -> Self {
        self.sort_index.store(false, AtomicOrdering::SeqCst);
        self
    }

    /// Start unreachable.
    pub fn offline(self) -> Self {
        self.online.store(false, AtomicOrdering::SeqCst);
        self
    }

    /// Toggle reachability at runtime.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, AtomicOrdering::SeqCst);
    }

    /// Forget every issued session token, as a store restart or cookie
    /// expiry does.
    pub fn revoke_all_sessions(&self) {
        self.sessions.clear();
    }

    /// Toggle sorted-query support at runtime.
    pub fn set_sort_index(&self, available: bool) {
        self.sort_index.store(available, AtomicOrdering::SeqCst);
    }

    fn ensure_online(&self, context: &str) -> AppResult<()> {
        if self.online.load(AtomicOrdering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::backend_unavailable(format!(
                "{context}: connection failed"
            )))
        }
    }

    fn is_admin_pair(&self, name: &str, password: &str) -> bool {
        self.admin
            .as_ref()
            .is_some_and(|(n, p)| n == name && p == password)
    }

    fn identify(&self, credential: &BackendCredential) -> AppResult<Identity> {
        let name = match credential {
            BackendCredential::SessionToken { token } => self
                .sessions
                .get(token)
                .map(|entry| entry.value().clone())
                .ok_or_else(|| {
                    AppError::unauthenticated("store session rejected").with_backend_status(401)
                })?,
            BackendCredential::Basic { username, password } => {
                let known = self.is_admin_pair(username, password)
                    || self
                        .passwords
                        .get(username)
                        .is_some_and(|p| p.value() == password);
                if !known {
                    return Err(AppError::unauthenticated("store credentials rejected")
                        .with_backend_status(401));
                }
                username.clone()
            }
        };
        let admin = self.admin.as_ref().is_some_and(|(n, _)| *n == name);
        Ok(Identity { name, admin })
    }

    fn check_access(&self, identity: &Identity, db: &str) -> AppResult<()> {
        if db == USERS_DB && !identity.admin {
            return Err(
                AppError::forbidden("only admins may access the account database")
                    .with_backend_status(403),
            );
        }
        if !self.databases.contains_key(db) {
            return Err(
                AppError::not_found(format!("database '{db}' does not exist"))
                    .with_backend_status(404),
            );
        }
        Ok(())
    }

    fn user_roles(&self, name: &str) -> Vec<String> {
        self.databases
            .get(USERS_DB)
            .and_then(|users| users.get(&format!("{USER_DOC_PREFIX}{name}")).cloned())
            .and_then(|doc| doc.get("roles").cloned())
            .and_then(|roles| serde_json::from_value(roles).ok())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn open_session(&self, name: &str, password: &str) -> AppResult<SessionGrant> {
        self.ensure_online("open session")?;

        let roles = if self.is_admin_pair(name, password) {
            vec![SERVER_ADMIN_ROLE.to_string()]
        } else if self
            .passwords
            .get(name)
            .is_some_and(|p| p.value() == password)
        {
            self.user_roles(name)
        } else {
            debug!(user = %name, "In-memory store rejected login");
            return Err(AppError::invalid_credentials("Invalid credentials"));
        };

        let token = uuid::Uuid::new_v4().simple().to_string();
        self.sessions.insert(token.clone(), name.to_string());
        Ok(SessionGrant {
            name: name.to_string(),
            roles,
            token,
        })
    }

    async fn close_session(&self, token: &str) -> AppResult<()> {
        self.ensure_online("close session")?;
        self.sessions.remove(token);
        Ok(())
    }

    async fn is_online(&self) -> AppResult<bool> {
        self.ensure_online("health probe")?;
        Ok(true)
    }

    async fn database_info(&self, credential: &BackendCredential, db: &str) -> AppResult<Value> {
        self.ensure_online("database info")?;
        let identity = self.identify(credential)?;
        self.check_access(&identity, db)?;

        let docs = self
            .databases
            .get(db)
            .map(|d| d.values().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        let external: usize = docs.iter().map(|d| d.to_string().len()).sum();
        Ok(json!({
            "db_name": db,
            "doc_count": docs.len(),
            "doc_del_count": 0,
            "sizes": { "file": external, "active": external, "external": external },
        }))
    }

    async fn security(&self, credential: &BackendCredential, db: &str) -> AppResult<Value> {
        self.ensure_online("security")?;
        let identity = self.identify(credential)?;
        if !identity.admin {
            return Err(AppError::forbidden("security: forbidden by store").with_backend_status(403));
        }
        self.check_access(&identity, db)?;
        Ok(json!({
            "admins": { "names": [], "roles": [] },
            "members": { "names": [], "roles": [] },
        }))
    }

    async fn get(
        &self,
        credential: &BackendCredential,
        db: &str,
        id: &str,
    ) -> AppResult<Option<Value>> {
        self.ensure_online("get")?;
        let identity = self.identify(credential)?;
        self.check_access(&identity, db)?;
        Ok(self.databases.get(db).and_then(|d| d.get(id).cloned()))
    }

    async fn put(
        &self,
        credential: &BackendCredential,
        db: &str,
        id: &str,
        doc: &Value,
    ) -> AppResult<String> {
        self.ensure_online("put")?;
        let identity = self.identify(credential)?;
        self.check_access(&identity, db)?;

        let Some(body) = doc.as_object() else {
            return Err(AppError::validation("put: document must be an object")
                .with_backend_status(400));
        };
        let mut body = body.clone();

        let mut docs = self.databases.get_mut(db).ok_or_else(|| {
            AppError::not_found(format!("database '{db}' does not exist")).with_backend_status(404)
        })?;

        let current_rev = docs
            .get(id)
            .and_then(|d| d.get("_rev"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let supplied_rev = body.get("_rev").and_then(Value::as_str).map(str::to_string);
        if current_rev != supplied_rev {
            return Err(AppError::conflict("put: revision conflict").with_backend_status(409));
        }

        if db == USERS_DB {
            if let Some(password) = body.remove("password").and_then(|p| p.as_str().map(String::from)) {
                let name = body
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| id.trim_start_matches(USER_DOC_PREFIX).to_string());
                self.passwords.insert(name, password);
            }
        }

        let rev = next_rev(current_rev.as_deref());
        body.insert("_id".into(), Value::from(id));
        body.insert("_rev".into(), Value::from(rev.as_str()));
        docs.insert(id.to_string(), Value::Object(body));
        Ok(rev)
    }

    async fn delete(
        &self,
        credential: &BackendCredential,
        db: &str,
        id: &str,
        rev: &str,
    ) -> AppResult<()> {
        self.ensure_online("delete")?;
        let identity = self.identify(credential)?;
        self.check_access(&identity, db)?;

        let mut docs = self.databases.get_mut(db).ok_or_else(|| {
            AppError::not_found(format!("database '{db}' does not exist")).with_backend_status(404)
        })?;
        let Some(existing) = docs.get(id) else {
            return Err(AppError::not_found("delete: not found").with_backend_status(404));
        };
        if existing.get("_rev").and_then(Value::as_str) != Some(rev) {
            return Err(AppError::conflict("delete: revision conflict").with_backend_status(409));
        }
        if let Some(removed) = docs.remove(id) {
            if db == USERS_DB {
                if let Some(name) = removed.get("name").and_then(Value::as_str) {
                    self.passwords.remove(name);
                }
            }
        }
        Ok(())
    }

    async fn find(
        &self,
        credential: &BackendCredential,
        db: &str,
        query: &FindQuery,
    ) -> AppResult<FindResponse> {
        self.ensure_online("find")?;
        let identity = self.identify(credential)?;
        self.check_access(&identity, db).map_err(|e| {
            let status = e.backend_status.unwrap_or(400);
            AppError::query_failed("find_failed").with_backend_status(status)
        })?;

        if query.sort.is_some() && !self.sort_index.load(AtomicOrdering::SeqCst) {
            return Err(AppError::query_failed("find_failed").with_backend_status(400));
        }

        let offset = match &query.bookmark {
            Some(bookmark) => decode_bookmark(bookmark.as_str())
                .ok_or_else(|| AppError::query_failed("find_failed").with_backend_status(400))?,
            None => 0,
        };

        let mut matched: Vec<Value> = self
            .databases
            .get(db)
            .map(|docs| {
                docs.iter()
                    .filter(|(id, _)| !id.starts_with("_design/"))
                    .map(|(_, doc)| doc)
                    .filter(|doc| matches_selector(doc, &query.selector))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = &query.sort {
            matched.retain(|doc| sort.iter().all(|s| doc.get(&s.field).is_some()));
            matched.sort_by(|a, b| {
                sort.iter()
                    .map(|s| {
                        let ord = collate(&a[&s.field], &b[&s.field]);
                        match s.direction {
                            SortDirection::Asc => ord,
                            SortDirection::Desc => ord.reverse(),
                        }
                    })
                    .find(|o| *o != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        let docs: Vec<Value> = matched
            .into_iter()
            .skip(offset)
            .take(query.limit.get() as usize)
            .map(|doc| project(doc, query.fields.as_deref()))
            .collect();

        let bookmark = encode_bookmark(offset + docs.len());
        let warning = query
            .sort
            .is_none()
            .then(|| "No matching index found, create an index to optimize query time.".to_string());
        Ok(FindResponse {
            docs,
            bookmark: Some(bookmark),
            warning,
        })
    }

    async fn all_docs(
        &self,
        credential: &BackendCredential,
        db: &str,
        range: &KeyRange,
    ) -> AppResult<Vec<AllDocsRow>> {
        self.ensure_online("all docs")?;
        let identity = self.identify(credential)?;
        self.check_access(&identity, db)?;

        Ok(self
            .databases
            .get(db)
            .map(|docs| {
                docs.iter()
                    .filter(|(id, _)| range.contains(id))
                    .map(|(id, doc)| AllDocsRow {
                        id: id.clone(),
                        doc: range.include_docs.then(|| doc.clone()),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn next_rev(current: Option<&str>) -> String {
    let generation = current
        .and_then(|rev| rev.split_once('-'))
        .and_then(|(n, _)| n.parse::<u64>().ok())
        .unwrap_or(0);
    format!("{}-{}", generation + 1, uuid::Uuid::new_v4().simple())
}

fn encode_bookmark(offset: usize) -> String {
    URL_SAFE_NO_PAD.encode(offset.to_string())
}

fn decode_bookmark(raw: &str) -> Option<usize> {
    let bytes = URL_SAFE_NO_PAD.decode(raw).ok()?;
    String::from_utf8(bytes).ok()?.parse().ok()
}

/// Equality, `$eq`, `$ne` and `$exists` conditions.
fn matches_selector(doc: &Value, selector: &Map<String, Value>) -> bool {
    selector.iter().all(|(field, condition)| {
        let actual = doc.get(field);
        match condition.as_object() {
            Some(ops) if ops.keys().all(|k| k.starts_with('$')) => {
                ops.iter().all(|(op, operand)| match op.as_str() {
                    "$eq" => actual == Some(operand),
                    "$ne" => actual != Some(operand),
                    "$exists" => actual.is_some() == operand.as_bool().unwrap_or(true),
                    _ => false,
                })
            }
            _ => actual == Some(condition),
        }
    })
}

fn project(doc: Value, fields: Option<&[String]>) -> Value {
    match (fields, doc) {
        (Some(fields), Value::Object(map)) => Value::Object(
            map.into_iter()
                .filter(|(k, _)| fields.iter().any(|f| f == k))
                .collect(),
        ),
        (_, doc) => doc,
    }
}

fn collation_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(false) => 1,
        Value::Bool(true) => 2,
        Value::Number(_) => 3,
        Value::String(_) => 4,
        Value::Array(_) => 5,
        Value::Object(_) => 6,
    }
}

fn collate(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => collation_rank(a).cmp(&collation_rank(b)),
    }
}
