//! Account administration under the admin credential.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_create_with_csv_roles_then_login() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let created = app
        .request(
            "POST",
            "/api/users",
            Some(json!({
                "name": "carol",
                "password": "carol-pw",
                "roles": "staff, app:admin",
                "fullName": "Carol C",
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["user"]["roles"], json!(["staff", "app:admin"]));

    let login = app
        .request(
            "POST",
            "/login",
            Some(json!({ "username": "carol", "password": "carol-pw" })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["user"]["roles"], json!(["app:admin", "staff"]));

    let list = app.request("GET", "/api/users", None, Some(&admin)).await;
    let names: Vec<&str> = list.body["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);
    assert!(list.body["rows"][0].get("password").is_none());
}

#[tokio::test]
async fn test_duplicate_user() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let body = json!({ "name": "bob", "password": "x", "roles": ["staff"] });
    let response = app
        .request("POST", "/api/users", Some(body), Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], "User exists");
}

#[tokio::test]
async fn test_update_and_delete_user() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let patched = app
        .request(
            "PATCH",
            "/api/users/bob",
            Some(json!({ "department": "Ops", "password": "new-pw" })),
            Some(&admin),
        )
        .await;
    assert_eq!(patched.status, StatusCode::OK);
    assert_eq!(patched.body["user"]["department"], "Ops");
    assert_eq!(patched.body["user"]["roles"], json!(["staff"]));
    app.login("bob", "new-pw").await;

    let deleted = app
        .request("DELETE", "/api/users/bob", None, Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    let again = app
        .request("DELETE", "/api/users/bob", None, Some(&admin))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_without_admin_credential() {
    let app = TestApp::without_admin();
    let admin = app.admin().await;
    let response = app.request("GET", "/api/users", None, Some(&admin)).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["message"], "admin_not_configured");
}

#[tokio::test]
async fn test_staff_cannot_manage_users() {
    let app = TestApp::new();
    let staff = app.staff().await;
    let response = app.request("GET", "/api/users", None, Some(&staff)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
