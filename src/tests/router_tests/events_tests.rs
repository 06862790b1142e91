use crate::db::events::count_events;
use crate::errors::ApiError;
use crate::router::handle;
use crate::tests::utils::{get_request, json_request, read_json_body, test_ctx};
use chrono::{DateTime, SubsecRound, Utc};
use serde_json::json;

fn sample_event() -> serde_json::Value {
    json!({
        "load_accepted": "true",
        "posted_price": "1500.50",
        "final_price": "1600",
        "total_negotiations": "3",
        "call_sentiment": "Positive",
        "commodity": "Steel Coils",
    })
}

#[test]
fn record_returns_201_with_assigned_id() {
    let ctx = test_ctx();

    let resp = handle(
        json_request("POST", "/loads/negotiations", sample_event()),
        &ctx,
    )
    .unwrap();
    assert_eq!(resp.status(), 201);

    let body = read_json_body(resp);
    assert_eq!(body["id"], json!(1));
    assert_eq!(body["load_accepted"], json!(true));
    assert_eq!(body["posted_price"], json!(1500.5));
    assert_eq!(body["final_price"], json!(1600.0));
    assert_eq!(body["total_negotiations"], json!(3));
    assert_eq!(body["call_sentiment"], json!("positive"));
    assert_eq!(body["commodity"], json!("Steel Coils"));

    // Second insert gets the next id.
    let resp = handle(
        json_request("POST", "/loads/negotiations", sample_event()),
        &ctx,
    )
    .unwrap();
    assert_eq!(read_json_body(resp)["id"], json!(2));
}

#[test]
fn record_then_list_round_trips_with_server_timestamp() {
    let ctx = test_ctx();

    let start = Utc::now().trunc_subsecs(0);
    handle(
        json_request("POST", "/loads/negotiations", sample_event()),
        &ctx,
    )
    .unwrap();
    let end = Utc::now();

    let resp = handle(get_request("/loads/negotiations"), &ctx).unwrap();
    assert_eq!(resp.status(), 200);

    let body = read_json_body(resp);
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event["load_accepted"], json!(true));
    assert_eq!(event["posted_price"], json!(1500.5));
    assert_eq!(event["final_price"], json!(1600.0));
    assert_eq!(event["total_negotiations"], json!(3));
    assert_eq!(event["call_sentiment"], json!("positive"));
    assert_eq!(event["commodity"], json!("Steel Coils"));

    let recorded_at: DateTime<Utc> = event["recorded_at"]
        .as_str()
        .unwrap()
        .parse()
        .expect("recorded_at is ISO-8601");
    assert!(recorded_at >= start, "{recorded_at} < {start}");
    assert!(recorded_at <= end, "{recorded_at} > {end}");
}

#[test]
fn list_is_in_insertion_order_and_filterable() {
    let ctx = test_ctx();

    let mut accepted = sample_event();
    accepted["commodity"] = json!("First");
    handle(json_request("POST", "/loads/negotiations", accepted), &ctx).unwrap();

    let mut rejected = sample_event();
    rejected["load_accepted"] = json!("false");
    rejected["commodity"] = json!("Second");
    handle(json_request("POST", "/loads/negotiations", rejected), &ctx).unwrap();

    let all = read_json_body(handle(get_request("/loads/negotiations"), &ctx).unwrap());
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["commodity"], json!("First"));
    assert_eq!(all[1]["commodity"], json!("Second"));

    let only_accepted = read_json_body(
        handle(get_request("/loads/negotiations?load_accepted=true"), &ctx).unwrap(),
    );
    let only_accepted = only_accepted.as_array().unwrap();
    assert_eq!(only_accepted.len(), 1);
    assert_eq!(only_accepted[0]["commodity"], json!("First"));

    let only_rejected = read_json_body(
        handle(get_request("/loads/negotiations?load_accepted=false"), &ctx).unwrap(),
    );
    assert_eq!(only_rejected.as_array().unwrap().len(), 1);
}

#[test]
fn bad_filter_value_is_rejected() {
    let ctx = test_ctx();

    let err = handle(get_request("/loads/negotiations?load_accepted=maybe"), &ctx).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Validation {
            field: "load_accepted",
            ..
        }
    ));
}

#[test]
fn malformed_price_persists_nothing() {
    let ctx = test_ctx();

    let mut payload = sample_event();
    payload["posted_price"] = json!("abc");

    let err = handle(json_request("POST", "/loads/negotiations", payload), &ctx).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Validation {
            field: "posted_price",
            ..
        }
    ));

    assert_eq!(count_events(&ctx.db).unwrap(), 0);
}

#[test]
fn native_json_types_are_accepted_too() {
    let ctx = test_ctx();

    let payload = json!({
        "load_accepted": false,
        "posted_price": 900,
        "final_price": 950.25,
        "total_negotiations": 0,
        "call_sentiment": "neutral",
        "commodity": "Produce",
    });

    let resp = handle(json_request("POST", "/loads/negotiations", payload), &ctx).unwrap();
    assert_eq!(resp.status(), 201);

    let body = read_json_body(resp);
    assert_eq!(body["load_accepted"], json!(false));
    assert_eq!(body["final_price"], json!(950.25));
}
