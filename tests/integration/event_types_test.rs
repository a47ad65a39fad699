//! Event type catalogue: public listing and admin CRUD.

use http::StatusCode;
use serde_json::{Value, json};

use crate::helpers::TestApp;

async fn create(app: &TestApp, cookie: &str, body: Value) -> StatusCode {
    app.request("POST", "/api/admin/event-types", Some(body), Some(cookie))
        .await
        .status
}

fn codes(body: &Value) -> Vec<&str> {
    body["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["code"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_deactivated_type_leaves_regular_listing() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let staff = app.staff().await;

    assert_eq!(
        create(&app, &admin, json!({ "code": "late", "name": "Late arrival" })).await,
        StatusCode::CREATED
    );
    assert_eq!(
        create(&app, &admin, json!({ "code": "late", "name": "Again" })).await,
        StatusCode::CONFLICT
    );
    assert_eq!(
        create(&app, &admin, json!({ "code": "in", "name": "Check in" })).await,
        StatusCode::CREATED
    );

    let patched = app
        .request(
            "PATCH",
            "/api/admin/event-types/late",
            Some(json!({ "active": false })),
            Some(&admin),
        )
        .await;
    assert_eq!(patched.status, StatusCode::OK);
    assert_eq!(patched.body["type"]["active"], false);
    assert_eq!(patched.body["type"]["name"], "Late arrival");

    let regular = app.request("GET", "/api/event-types", None, Some(&staff)).await;
    assert_eq!(codes(&regular.body), vec!["in"]);

    let all = app
        .request("GET", "/api/admin/event-types", None, Some(&admin))
        .await;
    let late = all.body["rows"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["code"] == "late")
        .unwrap();
    assert_eq!(late["active"], false);
}

#[tokio::test]
async fn test_conflict_message() {
    let app = TestApp::new();
    let admin = app.admin().await;
    create(&app, &admin, json!({ "code": "late" })).await;
    let response = app
        .request(
            "POST",
            "/api/admin/event-types",
            Some(json!({ "code": "late" })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.body, json!({ "ok": false, "message": "Type exists" }));
}

#[tokio::test]
async fn test_listing_sorted_by_name() {
    let app = TestApp::new();
    let admin = app.admin().await;
    for (code, name) in [("z", "zebra"), ("a", "Apple"), ("m", "mango")] {
        create(&app, &admin, json!({ "code": code, "name": name })).await;
    }
    let response = app.request("GET", "/api/event-types", None, Some(&admin)).await;
    assert_eq!(codes(&response.body), vec!["a", "m", "z"]);
}

#[tokio::test]
async fn test_invalid_and_missing_codes() {
    let app = TestApp::new();
    let admin = app.admin().await;
    assert_eq!(
        create(&app, &admin, json!({ "code": "has space" })).await,
        StatusCode::BAD_REQUEST
    );

    let patch = app
        .request(
            "PATCH",
            "/api/admin/event-types/ghost",
            Some(json!({ "name": "x" })),
            Some(&admin),
        )
        .await;
    assert_eq!(patch.status, StatusCode::NOT_FOUND);

    let delete = app
        .request("DELETE", "/api/admin/event-types/ghost", None, Some(&admin))
        .await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_routes_need_admin_role() {
    let app = TestApp::new();
    let staff = app.staff().await;
    assert_eq!(
        create(&app, &staff, json!({ "code": "late" })).await,
        StatusCode::FORBIDDEN
    );
    let list = app
        .request("GET", "/api/admin/event-types", None, Some(&staff))
        .await;
    assert_eq!(list.status, StatusCode::FORBIDDEN);

    let anonymous = app
        .request("GET", "/api/admin/event-types", None, None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_type() {
    let app = TestApp::new();
    let admin = app.admin().await;
    create(&app, &admin, json!({ "code": "late" })).await;
    let response = app
        .request("DELETE", "/api/admin/event-types/late", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let all = app
        .request("GET", "/api/admin/event-types", None, Some(&admin))
        .await;
    assert!(codes(&all.body).is_empty());
}

#[tokio::test]
async fn test_undecodable_path_answers_envelope() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let patch = app
        .request(
            "PATCH",
            "/api/admin/event-types/%FF",
            Some(json!({ "name": "x" })),
            Some(&admin),
        )
        .await;
    assert_eq!(patch.status, StatusCode::BAD_REQUEST);
    assert_eq!(patch.body["ok"], false);

    let delete = app
        .request("DELETE", "/api/users/%FF", None, Some(&admin))
        .await;
    assert_eq!(delete.status, StatusCode::BAD_REQUEST);
    assert_eq!(delete.body["ok"], false);
}
