//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use attendance_api::AppState;
use attendance_core::config::AppConfig;
use attendance_store::memory::MemoryDocumentStore;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store, for toggling availability and seeding
    pub store: Arc<MemoryDocumentStore>,
}

/// Response captured from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
    /// `name=value` part of the first `Set-Cookie` header
    pub cookie: Option<String>,
}

impl TestApp {
    /// App with an admin credential configured, and two accounts:
    /// `alice` (`app:admin`) and `bob` (`staff`).
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Same accounts, but no admin credential in configuration.
    pub fn without_admin() -> Self {
        Self::build(false)
    }

    fn build(with_admin: bool) -> Self {
        let mut config = AppConfig::default();
        config.store.url = "memory://".into();
        config.session.secret = "integration-secret".into();
        if with_admin {
            config.store.admin_user = "admin".into();
            config.store.admin_password = "secret".into();
        }

        let store = Arc::new(
            MemoryDocumentStore::new()
                .with_database(&config.store.database)
                .with_admin("admin", "secret")
                .with_user("alice", "alice-pw", &["app:admin"])
                .with_user("bob", "bob-pw", &["staff"]),
        );
        let router = attendance_api::build_app(AppState::new(config, store.clone()));
        Self { router, store }
    }

    /// Send a request, optionally with a JSON body and a session cookie
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            cookie,
        }
    }

    /// Log in and return the session cookie
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/login",
                Some(serde_json::json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
        response.cookie.expect("login set no cookie")
    }

    /// Session cookie for the `app:admin` account
    pub async fn admin(&self) -> String {
        self.login("alice", "alice-pw").await
    }

    /// Session cookie for the `staff` account
    pub async fn staff(&self) -> String {
        self.login("bob", "bob-pw").await
    }
}
