//! Event recording and cursor-paginated listing.

use http::StatusCode;
use serde_json::{Value, json};

use crate::helpers::TestApp;

async fn record(app: &TestApp, cookie: &str, type_code: &str, payload: &str) -> String {
    let response = app
        .request(
            "POST",
            "/api/events",
            Some(json!({ "type": type_code, "qrData": payload })),
            Some(cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.body["id"].as_str().unwrap().to_string()
}

fn stamps(body: &Value) -> Vec<String> {
    body["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["ts"].as_str().unwrap().to_string())
        .collect()
}

fn is_newest_first(stamps: &[String]) -> bool {
    stamps.windows(2).all(|w| w[0] >= w[1])
}

#[tokio::test]
async fn test_record_and_list() {
    let app = TestApp::new();
    let cookie = app.staff().await;
    let id = record(&app, &cookie, "in", "badge-7").await;
    assert!(id.starts_with("event:"));

    let response = app.request("GET", "/api/events", None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    let row = &response.body["rows"][0];
    assert_eq!(row["_id"], id.as_str());
    assert_eq!(row["type"], "in");
    assert_eq!(row["qrData"], "badge-7");
    assert_eq!(row["createdBy"], "bob");
    assert_eq!(response.body["bookmark"], Value::Null);
}

#[tokio::test]
async fn test_record_requires_type_and_payload() {
    let app = TestApp::new();
    let cookie = app.staff().await;
    let response = app
        .request("POST", "/api/events", Some(json!({ "type": "in" })), Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "type and qrData required");
}

#[tokio::test]
async fn test_pages_walk_forward_newest_first() {
    let app = TestApp::new();
    let cookie = app.staff().await;
    for i in 0..5 {
        record(&app, &cookie, "in", &format!("badge-{i}")).await;
    }

    let first = app
        .request("GET", "/api/events?limit=2", None, Some(&cookie))
        .await;
    assert_eq!(first.body["rows"].as_array().unwrap().len(), 2);
    let bookmark = first.body["bookmark"].as_str().unwrap().to_string();

    let second = app
        .request(
            "GET",
            &format!("/api/events?limit=2&bookmark={bookmark}"),
            None,
            Some(&cookie),
        )
        .await;
    assert_eq!(second.body["rows"].as_array().unwrap().len(), 2);
    let bookmark = second.body["bookmark"].as_str().unwrap().to_string();

    let third = app
        .request(
            "GET",
            &format!("/api/events?limit=2&bookmark={bookmark}"),
            None,
            Some(&cookie),
        )
        .await;
    assert_eq!(third.body["rows"].as_array().unwrap().len(), 1);
    assert_eq!(third.body["bookmark"], Value::Null);

    let mut all = stamps(&first.body);
    all.extend(stamps(&second.body));
    all.extend(stamps(&third.body));
    assert_eq!(all.len(), 5);
    assert!(is_newest_first(&all));
}

#[tokio::test]
async fn test_fallback_path_still_newest_first() {
    let app = TestApp::new();
    let cookie = app.staff().await;
    for i in 0..4 {
        record(&app, &cookie, "in", &format!("badge-{i}")).await;
    }
    app.store.set_sort_index(false);

    let response = app.request("GET", "/api/events", None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    let all = stamps(&response.body);
    assert_eq!(all.len(), 4);
    assert!(is_newest_first(&all));
}

#[tokio::test]
async fn test_filters_and_out_of_range_limits() {
    let app = TestApp::new();
    let cookie = app.staff().await;
    record(&app, &cookie, "in", "a").await;
    record(&app, &cookie, "out", "a").await;

    let only_out = app
        .request("GET", "/api/events?type=out", None, Some(&cookie))
        .await;
    assert_eq!(only_out.body["rows"].as_array().unwrap().len(), 1);
    assert_eq!(only_out.body["rows"][0]["type"], "out");

    for limit in ["0", "-5", "101", "abc"] {
        let response = app
            .request("GET", &format!("/api/events?limit={limit}"), None, Some(&cookie))
            .await;
        assert_eq!(response.status, StatusCode::OK, "limit={limit}");
        assert_eq!(response.body["rows"].as_array().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn test_bad_bookmark_fails_both_attempts() {
    let app = TestApp::new();
    let cookie = app.staff().await;
    let response = app
        .request("GET", "/api/events?bookmark=%21%21", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["message"], "find_failed");
    assert_eq!(response.body["status"], 400);
}

#[tokio::test]
async fn test_repeated_query_keys_answer_envelope() {
    let app = TestApp::new();
    let cookie = app.staff().await;
    for path in ["/api/events?type=a&type=b", "/api/events?limit=1&limit=2"] {
        let response = app.request("GET", path, None, Some(&cookie)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(response.body["ok"], false, "{path}");
        assert!(response.body["message"].is_string(), "{path}");
    }
}

#[tokio::test]
async fn test_limit_reads_leading_digits() {
    let app = TestApp::new();
    let cookie = app.staff().await;
    for i in 0..3 {
        record(&app, &cookie, "in", &format!("badge-{i}")).await;
    }
    let response = app
        .request("GET", "/api/events?limit=2abc", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["rows"].as_array().unwrap().len(), 2);
}
