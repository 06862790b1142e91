use crate::errors::ApiError;
use crate::router::handle;
use crate::tests::utils::{get_request, json_request, read_json_body, test_ctx};
use serde_json::json;

#[test]
fn search_filters_by_equipment_and_caps_at_five() {
    let ctx = test_ctx();

    let resp = handle(get_request("/loads/search?equipment_type=Dry+Van"), &ctx).unwrap();
    assert_eq!(resp.status(), 200);

    let body = read_json_body(resp);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 5);

    let mut last_rate = f64::MAX;
    for item in items {
        assert_eq!(item["equipment_type"], json!("Dry Van"));
        let rate = item["loadboard_rate"].as_f64().unwrap();
        assert!(rate <= last_rate, "results not sorted by rate desc");
        last_rate = rate;
    }
}

#[test]
fn search_applies_origin_substring_filter() {
    let ctx = test_ctx();

    let resp = handle(
        get_request("/loads/search?equipment_type=Flatbed&origin=birmingham"),
        &ctx,
    )
    .unwrap();

    let body = read_json_body(resp);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["origin"], json!("Birmingham, AL"));
}

#[test]
fn search_without_equipment_type_is_a_validation_error() {
    let ctx = test_ctx();

    let err = handle(get_request("/loads/search"), &ctx).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Validation {
            field: "equipment_type",
            ..
        }
    ));
}

#[test]
fn search_with_bad_pickup_after_is_rejected() {
    let ctx = test_ctx();

    let err = handle(
        get_request("/loads/search?equipment_type=Reefer&pickup_after=yesterday"),
        &ctx,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Validation {
            field: "pickup_after",
            ..
        }
    ));
}

#[test]
fn match_returns_a_load_from_the_origin_state() {
    let ctx = test_ctx();

    let req = json_request(
        "POST",
        "/loads/match",
        json!({"origin": "Dallas, TX", "equipment_type": "Dry Van"}),
    );
    let resp = handle(req, &ctx).unwrap();
    assert_eq!(resp.status(), 200);

    let body = read_json_body(resp);
    assert!(body["origin"].as_str().unwrap().ends_with(", TX"));
    assert_eq!(body["equipment_type"], json!("Dry Van"));
}

#[test]
fn match_with_unknown_state_is_not_found() {
    let ctx = test_ctx();

    let req = json_request(
        "POST",
        "/loads/match",
        json!({"origin": "Toronto, ON", "equipment_type": "Dry Van"}),
    );
    let err = handle(req, &ctx).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn verify_fmcsa_requires_numeric_mc() {
    let ctx = test_ctx();

    let err = handle(get_request("/verify_fmcsa?mc=12a45"), &ctx).unwrap_err();
    assert!(matches!(err, ApiError::Validation { field: "mc", .. }));

    let err = handle(get_request("/verify_fmcsa"), &ctx).unwrap_err();
    assert!(matches!(err, ApiError::Validation { field: "mc", .. }));
}

#[test]
fn verify_fmcsa_without_webkey_reports_upstream_unavailable() {
    // test_ctx leaves the web key unset, so the lookup must fail fast
    // without attempting the network call.
    let ctx = test_ctx();

    let err = handle(get_request("/verify_fmcsa?mc=123456"), &ctx).unwrap_err();
    assert!(matches!(err, ApiError::Upstream(_)));
    assert_eq!(err.status(), 502);
}
