//! Badge QR generation.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_badge_response_shape() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let response = app
        .request(
            "POST",
            "/api/admin/qr",
            Some(json!({
                "username": "bob",
                "employeeId": "E 42",
                "fullName": " Bob Builder ",
                "department": "Ops"
            })),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let body = &response.body;
    assert_eq!(body["ok"], true);
    assert_eq!(body["filename"], "qr_bob_E_42.png");
    assert_eq!(body["mime"], "image/png");

    let payload = &body["payload"];
    assert_eq!(payload["v"], 1);
    assert_eq!(payload["uid"], "bob");
    assert_eq!(payload["eid"], "E 42");
    assert_eq!(payload["n"], "Bob Builder");
    assert_eq!(payload["d"], "Ops");
    assert_eq!(payload["p"], "");
    assert!(payload["iat"].as_str().unwrap().ends_with('Z'));

    let data_url = body["dataUrl"].as_str().unwrap();
    assert!(data_url.starts_with("data:image/png;base64,"));
    assert_eq!(body["sizeHint"], data_url.len());
}

#[tokio::test]
async fn test_badge_requires_username_and_employee_id() {
    let app = TestApp::new();
    let admin = app.admin().await;
    for body in [json!({ "username": "bob" }), json!({ "employeeId": "E1" }), json!({})] {
        let response = app
            .request("POST", "/api/admin/qr", Some(body.clone()), Some(&admin))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response.body["ok"], false);
        assert_eq!(response.body["message"], "username and employeeId are required");
    }
}

#[tokio::test]
async fn test_badge_is_admin_only() {
    let app = TestApp::new();
    let staff = app.staff().await;
    let body = json!({ "username": "bob", "employeeId": "E1" });
    let forbidden = app
        .request("POST", "/api/admin/qr", Some(body.clone()), Some(&staff))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let anonymous = app.request("POST", "/api/admin/qr", Some(body), None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}
