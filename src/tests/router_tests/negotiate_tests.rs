use crate::errors::ApiError;
use crate::router::handle;
use crate::tests::utils::{json_request, read_json_body, test_ctx};
use serde_json::json;

#[test]
fn counter_below_listed_is_accepted() {
    let ctx = test_ctx();

    let req = json_request(
        "POST",
        "/negotiate",
        json!({"listed_rate": 2000, "counter_offer": 1800}),
    );
    let resp = handle(req, &ctx).unwrap();
    assert_eq!(resp.status(), 200);

    let body = read_json_body(resp);
    assert_eq!(body["accepted"], json!(true));
    assert_eq!(body["reason"], json!("accepted"));
    assert!(body.get("counter_price").is_none());
}

#[test]
fn equal_values_are_accepted() {
    let ctx = test_ctx();

    let req = json_request(
        "POST",
        "/negotiate",
        json!({"listed_rate": 2000, "counter_offer": 2000}),
    );
    let body = read_json_body(handle(req, &ctx).unwrap());
    assert_eq!(body["accepted"], json!(true));
}

#[test]
fn fifteen_percent_over_is_rejected() {
    let ctx = test_ctx();

    let req = json_request(
        "POST",
        "/negotiate",
        json!({"listed_rate": 2000, "counter_offer": 2300}),
    );
    let body = read_json_body(handle(req, &ctx).unwrap());
    assert_eq!(body["accepted"], json!(false));
    assert_eq!(body["reason"], json!("too_high"));
    assert!(body.get("counter_price").is_none());
}

#[test]
fn five_percent_over_is_countered_at_midpoint() {
    let ctx = test_ctx();

    let req = json_request(
        "POST",
        "/negotiate",
        json!({"listed_rate": 2000, "counter_offer": 2100}),
    );
    let body = read_json_body(handle(req, &ctx).unwrap());
    assert_eq!(body["accepted"], json!(false));
    assert_eq!(body["reason"], json!("countered"));
    assert_eq!(body["counter_price"], json!(2050.0));
}

#[test]
fn non_positive_rate_is_a_validation_error() {
    let ctx = test_ctx();

    let req = json_request(
        "POST",
        "/negotiate",
        json!({"listed_rate": 0, "counter_offer": 100}),
    );
    let err = handle(req, &ctx).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Validation {
            field: "listed_rate",
            ..
        }
    ));
    assert_eq!(err.status(), 400);
}

#[test]
fn missing_field_is_a_bad_request() {
    let ctx = test_ctx();

    let req = json_request("POST", "/negotiate", json!({"listed_rate": 2000}));
    let err = handle(req, &ctx).unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
    assert!(err.to_string().contains("counter_offer"));
}

#[test]
fn identical_requests_yield_identical_responses() {
    let ctx = test_ctx();

    let payload = json!({"listed_rate": 2000, "counter_offer": 2100});
    let first = read_json_body(handle(json_request("POST", "/negotiate", payload.clone()), &ctx).unwrap());
    let second = read_json_body(handle(json_request("POST", "/negotiate", payload), &ctx).unwrap());
    assert_eq!(first, second);
}
