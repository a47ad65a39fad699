//! Summary, database details and health.

use http::StatusCode;
use serde_json::Value;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_summary_with_and_without_admin() {
    let app = TestApp::new();
    let cookie = app.staff().await;
    let response = app.request("GET", "/api/summary", None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["db"], "attendance");
    assert_eq!(response.body["online"], true);
    assert_eq!(response.body["active"], true);
    assert_eq!(response.body["usersCount"], 2);

    let app = TestApp::without_admin();
    let cookie = app.staff().await;
    let response = app.request("GET", "/api/summary", None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["usersCount"], Value::Null);
}

#[tokio::test]
async fn test_db_details_security_needs_admin() {
    let app = TestApp::new();
    let cookie = app.staff().await;
    let response = app
        .request("GET", "/api/db-details", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["details"].get("security").is_some());

    let app = TestApp::without_admin();
    let cookie = app.staff().await;
    let response = app
        .request("GET", "/api/db-details", None, Some(&cookie))
        .await;
    assert!(response.body["details"].get("security").is_none());
}

#[tokio::test]
async fn test_health_reflects_store() {
    let app = TestApp::new();
    let up = app.request("GET", "/api/health", None, None).await;
    assert_eq!(up.body["backend"], "up");

    app.store.set_online(false);
    let down = app.request("GET", "/api/health", None, None).await;
    assert_eq!(down.status, StatusCode::OK);
    assert_eq!(down.body["backend"], "down");
}
