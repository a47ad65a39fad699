//! Login, logout and session guard.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_login_returns_store_roles() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/login",
            Some(json!({ "username": "alice", "password": "alice-pw" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["ok"], true);
    assert_eq!(response.body["user"]["name"], "alice");
    assert_eq!(response.body["user"]["roles"], json!(["app:admin"]));
    assert!(response.cookie.unwrap().starts_with("sid="));
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_look_alike() {
    let app = TestApp::new();
    let wrong = app
        .request(
            "POST",
            "/login",
            Some(json!({ "username": "bob", "password": "nope" })),
            None,
        )
        .await;
    let unknown = app
        .request(
            "POST",
            "/login",
            Some(json!({ "username": "nobody", "password": "nope" })),
            None,
        )
        .await;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body, unknown.body);
    assert_eq!(wrong.body["message"], "Invalid credentials");
    assert!(wrong.cookie.is_none());
}

#[tokio::test]
async fn test_missing_credentials() {
    let app = TestApp::new();
    let response = app
        .request("POST", "/login", Some(json!({ "username": "bob" })), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Missing credentials");
}

#[tokio::test]
async fn test_store_down_is_bad_gateway() {
    let app = TestApp::new();
    app.store.set_online(false);
    let response = app
        .request(
            "POST",
            "/login",
            Some(json!({ "username": "bob", "password": "bob-pw" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["message"], "login_failed");
}

#[tokio::test]
async fn test_logout_destroys_session() {
    let app = TestApp::new();
    let cookie = app.staff().await;

    let me = app.request("GET", "/me", None, Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["user"]["name"], "bob");

    let out = app.request("POST", "/logout", None, Some(&cookie)).await;
    assert_eq!(out.status, StatusCode::OK);
    assert_eq!(out.body, json!({ "ok": true }));

    let me = app.request("GET", "/me", None, Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    let events = app.request("GET", "/api/events", None, Some(&cookie)).await;
    assert_eq!(events.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_survives_store_outage() {
    let app = TestApp::new();
    let cookie = app.staff().await;
    app.store.set_online(false);

    let out = app.request("POST", "/logout", None, Some(&cookie)).await;
    assert_eq!(out.status, StatusCode::OK);

    app.store.set_online(true);
    let me = app.request("GET", "/me", None, Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refused_store_token_ends_app_session() {
    let app = TestApp::new();
    let cookie = app.staff().await;
    app.store.revoke_all_sessions();

    let events = app.request("GET", "/api/events", None, Some(&cookie)).await;
    assert_eq!(events.status, StatusCode::UNAUTHORIZED);
    assert_eq!(events.body["ok"], false);
    assert_eq!(events.body["message"], "Session expired");
    assert_eq!(events.cookie.as_deref(), Some("sid="));

    let me = app.request("GET", "/me", None, Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refused_store_token_on_summary() {
    let app = TestApp::new();
    let cookie = app.staff().await;
    app.store.revoke_all_sessions();

    let summary = app.request("GET", "/api/summary", None, Some(&cookie)).await;
    assert_eq!(summary.status, StatusCode::UNAUTHORIZED);

    let me = app.request("GET", "/me", None, Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}
