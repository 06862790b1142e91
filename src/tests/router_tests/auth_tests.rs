use crate::errors::ApiError;
use crate::router::handle;
use crate::tests::utils::{json_request, read_json_body, test_ctx};
use astra::Body;
use serde_json::json;

#[test]
fn health_bypasses_api_key_check() {
    let ctx = test_ctx();

    let req = http::Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, &ctx).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(read_json_body(resp), json!({ "ok": true }));
}

#[test]
fn dashboard_bypasses_api_key_check() {
    let ctx = test_ctx();

    let req = http::Request::builder()
        .method("GET")
        .uri("/dashboard")
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, &ctx).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "text/html; charset=utf-8"
    );
}

#[test]
fn missing_api_key_is_unauthorized() {
    let ctx = test_ctx();

    let req = http::Request::builder()
        .method("GET")
        .uri("/loads/negotiations")
        .body(Body::empty())
        .unwrap();

    let err = handle(req, &ctx).unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(err.status(), 401);
}

#[test]
fn wrong_api_key_is_unauthorized() {
    let ctx = test_ctx();

    let req = http::Request::builder()
        .method("POST")
        .uri("/negotiate")
        .header("x-api-key", "not-the-key")
        .body(Body::from(
            json!({"listed_rate": 1000, "counter_offer": 900}).to_string(),
        ))
        .unwrap();

    let err = handle(req, &ctx).unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[test]
fn unknown_route_is_not_found() {
    let ctx = test_ctx();

    let err = handle(json_request("POST", "/no/such/route", json!({})), &ctx).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(err.status(), 404);
}
