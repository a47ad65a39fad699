//! Document store operations over the CouchDB HTTP API.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use attendance_core::error::AppError;
use attendance_core::result::AppResult;
use attendance_core::traits::DocumentStore;
use attendance_core::types::{
    AllDocsRow, BackendCredential, FindQuery, FindResponse, KeyRange, SessionGrant,
};

use super::client::{AUTH_COOKIE, CouchClient, json_body, session_token, status_error};

/// HTTP-backed document store.
#[derive(Debug, Clone)]
pub struct CouchDocumentStore {
    /// Shared client.
    client: CouchClient,
}

#[derive(Debug, Default, Deserialize)]
struct UserCtx {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SessionAnswer {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    roles: Option<Vec<String>>,
    #[serde(default, rename = "userCtx")]
    user_ctx: Option<UserCtx>,
}

#[derive(Debug, Deserialize)]
struct WriteAnswer {
    #[serde(default)]
    rev: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AllDocsAnswer {
    #[serde(default)]
    rows: Vec<AllDocsRow>,
}

impl CouchDocumentStore {
    /// Wrap a connected client.
    pub fn new(client: CouchClient) -> Self {
        Self { client }
    }

    async fn get_json(
        &self,
        credential: &BackendCredential,
        segments: &[&str],
        context: &str,
    ) -> AppResult<Value> {
        let url = self.client.url(segments);
        let response = self
            .client
            .send(self.client.authorized(Method::GET, url, credential), context)
            .await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(status_error(context, status));
        }
        json_body(response, context).await
    }
}

#[async_trait]
impl DocumentStore for CouchDocumentStore {
    async fn open_session(&self, name: &str, password: &str) -> AppResult<SessionGrant> {
        let url = self.client.url(&["_session"]);
        let request = self
            .client
            .request(Method::POST, url)
            .json(&json!({ "name": name, "password": password }));
        let response = self.client.send(request, "open session").await?;
        let status = response.status();

        if status.is_server_error() {
            return Err(status_error("open session", status));
        }
        if status != StatusCode::OK {
            debug!(user = %name, status = status.as_u16(), "Store rejected login");
            return Err(AppError::invalid_credentials("Invalid credentials"));
        }

        let Some(token) = session_token(&response) else {
            warn!(user = %name, "Store login answer carried no {AUTH_COOKIE} cookie");
            return Err(AppError::invalid_credentials("Invalid credentials"));
        };

        let answer: SessionAnswer = response
            .json()
            .await
            .map_err(|_| AppError::invalid_credentials("Invalid credentials"))?;

        let ctx = answer.user_ctx.unwrap_or_default();
        let roles = answer.roles.unwrap_or(ctx.roles);
        let resolved_name = answer
            .name
            .or(ctx.name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| name.to_string());

        Ok(SessionGrant {
            name: resolved_name,
            roles,
            token,
        })
    }

    async fn close_session(&self, token: &str) -> AppResult<()> {
        let url = self.client.url(&["_session"]);
        let credential = BackendCredential::session_token(token);
        let response = self
            .client
            .send(
                self.client.authorized(Method::DELETE, url, &credential),
                "close session",
            )
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error("close session", status));
        }
        Ok(())
    }

    async fn is_online(&self) -> AppResult<bool> {
        let url = self.client.url(&["_up"]);
        let response = self
            .client
            .send(self.client.request(Method::GET, url), "health probe")
            .await?;
        if response.status() != StatusCode::OK {
            return Ok(false);
        }
        let body: Value = json_body(response, "health probe").await?;
        Ok(body.get("status").and_then(Value::as_str) == Some("ok"))
    }

    async fn database_info(&self, credential: &BackendCredential, db: &str) -> AppResult<Value> {
        self.get_json(credential, &[db], "database info").await
    }

    async fn security(&self, credential: &BackendCredential, db: &str) -> AppResult<Value> {
        self.get_json(credential, &[db, "_security"], "security").await
    }

    async fn get(
        &self,
        credential: &BackendCredential,
        db: &str,
        id: &str,
    ) -> AppResult<Option<Value>> {
        let url = self.client.url(&[db, id]);
        let response = self
            .client
            .send(self.client.authorized(Method::GET, url, credential), "get")
            .await?;
        match response.status() {
            StatusCode::OK => json_body(response, "get").await.map(Some),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(status_error("get", status)),
        }
    }

    async fn put(
        &self,
        credential: &BackendCredential,
        db: &str,
        id: &str,
        doc: &Value,
    ) -> AppResult<String> {
        let url = self.client.url(&[db, id]);
        let request = self
            .client
            .authorized(Method::PUT, url, credential)
            .json(doc);
        let response = self.client.send(request, "put").await?;
        let status = response.status();
        if status != StatusCode::CREATED && status != StatusCode::ACCEPTED {
            return Err(status_error("put", status));
        }
        let answer: WriteAnswer = json_body(response, "put").await?;
        answer
            .rev
            .ok_or_else(|| AppError::backend_unavailable("put: answer carried no revision"))
    }

    async fn delete(
        &self,
        credential: &BackendCredential,
        db: &str,
        id: &str,
        rev: &str,
    ) -> AppResult<()> {
        let mut url = self.client.url(&[db, id]);
        url.query_pairs_mut().append_pair("rev", rev);
        let response = self
            .client
            .send(
                self.client.authorized(Method::DELETE, url, credential),
                "delete",
            )
            .await?;
        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::ACCEPTED {
            return Err(status_error("delete", status));
        }
        Ok(())
    }

    async fn find(
        &self,
        credential: &BackendCredential,
        db: &str,
        query: &FindQuery,
    ) -> AppResult<FindResponse> {
        let url = self.client.url(&[db, "_find"]);
        let request = self
            .client
            .authorized(Method::POST, url, credential)
            .json(&query.to_body());
        let response = self
            .client
            .send(request, "find")
            .await
            .map_err(|e| {
                debug!(db = %db, error = %e, "Find transport failure");
                e
            })?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::query_failed("find_failed").with_backend_status(status.as_u16()));
        }
        let answer: FindResponse = json_body(response, "find").await?;
        if let Some(warning) = &answer.warning {
            debug!(db = %db, warning = %warning, "Store find warning");
        }
        Ok(answer)
    }

    async fn all_docs(
        &self,
        credential: &BackendCredential,
        db: &str,
        range: &KeyRange,
    ) -> AppResult<Vec<AllDocsRow>> {
        let mut url = self.client.url(&[db, "_all_docs"]);
        url.query_pairs_mut()
            .append_pair("startkey", &Value::from(range.start_key.as_str()).to_string())
            .append_pair("endkey", &Value::from(range.end_key.as_str()).to_string())
            .append_pair("include_docs", if range.include_docs { "true" } else { "false" });
        let response = self
            .client
            .send(
                self.client.authorized(Method::GET, url, credential),
                "all docs",
            )
            .await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(status_error("all docs", status));
        }
        let answer: AllDocsAnswer = json_body(response, "all docs").await?;
        Ok(answer.rows)
    }
}
