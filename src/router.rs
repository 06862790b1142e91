use crate::auth;
use crate::config::Config;
use crate::db::events::{self, NewEvent};
use crate::db::loads::fetch_all_loads;
use crate::db::Database;
use crate::errors::{ApiError, ResultResp};
use crate::fmcsa::{self, FmcsaError};
use crate::matching;
use crate::negotiation::{self, DecisionReason};
use crate::responses::{html_response, json_response};
use crate::templates;
use astra::Request;
use chrono::{SubsecRound, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;

/// Everything a request handler needs, constructed once at startup.
pub struct AppContext {
    pub db: Database,
    pub config: Config,
}

pub fn handle(mut req: Request, ctx: &AppContext) -> ResultResp {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    // Health and the dashboard page bypass the key check; the dashboard
    // itself calls the API with the key it keeps client-side.
    match (method.as_str(), path.as_str()) {
        ("GET", "/health") => return json_response(200, &serde_json::json!({ "ok": true })),
        ("GET", "/dashboard") => return html_response(templates::pages::dashboard_page()),
        _ => {}
    }

    auth::require_api_key(&req, &ctx.config.api_key)?;

    match (method.as_str(), path.as_str()) {
        ("POST", "/negotiate") => negotiate(&mut req, ctx),
        ("POST", "/loads/negotiations") => record_event(&mut req, ctx),
        ("GET", "/loads/negotiations") => list_events(&req, ctx),
        ("GET", "/loads/search") => search_loads(&req, ctx),
        ("POST", "/loads/match") => match_load(&mut req, ctx),
        ("GET", "/verify_fmcsa") => verify_fmcsa(&req, ctx),
        _ => Err(ApiError::NotFound(format!("no route for {method} {path}"))),
    }
}

// ---- /negotiate -----------------------------------------------------------

#[derive(Deserialize)]
struct NegotiateBody {
    listed_rate: f64,
    counter_offer: f64,
}

#[derive(serde::Serialize)]
struct NegotiateResponse {
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    counter_price: Option<f64>,
    reason: DecisionReason,
}

fn negotiate(req: &mut Request, ctx: &AppContext) -> ResultResp {
    let body: NegotiateBody = read_json(req)?;

    let listed_rate = to_decimal(body.listed_rate, "listed_rate")?;
    let counter_offer = to_decimal(body.counter_offer, "counter_offer")?;

    let decision =
        negotiation::evaluate(listed_rate, counter_offer, ctx.config.counter_tolerance)?;

    json_response(
        200,
        &NegotiateResponse {
            accepted: decision.accepted,
            counter_price: decision.counter_price.and_then(|d| d.to_f64()),
            reason: decision.reason,
        },
    )
}

fn to_decimal(value: f64, field: &'static str) -> Result<Decimal, ApiError> {
    Decimal::try_from(value).map_err(|_| ApiError::Validation {
        field,
        message: "must be a finite number".to_string(),
    })
}

// ---- /loads/negotiations --------------------------------------------------

fn record_event(req: &mut Request, ctx: &AppContext) -> ResultResp {
    let payload: Value = read_json(req)?;
    let event = NewEvent::from_payload(&payload)?;

    // Server-assigned, truncated to whole seconds for a stable wire format.
    let recorded_at = Utc::now().trunc_subsecs(0);
    let id = events::insert_event(&ctx.db, &event, recorded_at)?;

    json_response(201, &event.into_stored(id, recorded_at)?)
}

fn list_events(req: &Request, ctx: &AppContext) -> ResultResp {
    let params = parse_query(req);
    let accepted = match params.get("load_accepted").map(String::as_str) {
        None => None,
        Some("true") => Some(true),
        Some("false") => Some(false),
        Some(_) => {
            return Err(ApiError::Validation {
                field: "load_accepted",
                message: "must be 'true' or 'false'".to_string(),
            })
        }
    };

    let events = events::list_events(&ctx.db, accepted)?;
    json_response(200, &events)
}

// ---- /loads/search and /loads/match ---------------------------------------

fn search_loads(req: &Request, ctx: &AppContext) -> ResultResp {
    let params = parse_query(req);

    let equipment_type = params
        .get("equipment_type")
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::Validation {
            field: "equipment_type",
            message: "is required".to_string(),
        })?;
    let origin = params.get("origin").map(String::as_str);

    let pickup_after = match params.get("pickup_after") {
        None => None,
        Some(raw) => Some(matching::parse_datetime(raw).ok_or(ApiError::Validation {
            field: "pickup_after",
            message: "must be an ISO datetime like 2024-05-02T08:00".to_string(),
        })?),
    };

    let loads = fetch_all_loads(&ctx.db)?;
    let items = matching::search_loads(&loads, equipment_type, origin, pickup_after);
    json_response(200, &serde_json::json!({ "items": items }))
}

#[derive(Deserialize)]
struct MatchBody {
    origin: String,
    equipment_type: String,
}

fn match_load(req: &mut Request, ctx: &AppContext) -> ResultResp {
    let body: MatchBody = read_json(req)?;

    let origin_state = matching::extract_state(&body.origin);
    let loads = fetch_all_loads(&ctx.db)?;

    match matching::select_load(&loads, &origin_state, &body.equipment_type) {
        Some(load) => json_response(200, load),
        None => Err(ApiError::NotFound(
            "No loads available for the provided origin".to_string(),
        )),
    }
}

// ---- /verify_fmcsa --------------------------------------------------------

fn verify_fmcsa(req: &Request, ctx: &AppContext) -> ResultResp {
    let params = parse_query(req);
    let mc = params.get("mc").ok_or(ApiError::Validation {
        field: "mc",
        message: "is required".to_string(),
    })?;

    if mc.is_empty() || !mc.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::Validation {
            field: "mc",
            message: "must be numeric".to_string(),
        });
    }

    let record = fmcsa::fetch_carrier_by_mc(mc, &ctx.config.fmcsa_webkey).map_err(|e| match e {
        FmcsaError::NotFound => ApiError::NotFound("Carrier not found".to_string()),
        FmcsaError::Unavailable(msg) => ApiError::Upstream(msg),
    })?;

    json_response(200, &record)
}

// ---- request plumbing -----------------------------------------------------

fn read_json<T: serde::de::DeserializeOwned>(req: &mut Request) -> Result<T, ApiError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut buf)
        .map_err(|e| ApiError::BadRequest(format!("failed to read request body: {e}")))?;

    serde_json::from_slice(&buf).map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    let mut map = HashMap::new();

    if let Some(q) = req.uri().query() {
        for pair in q.split('&') {
            let mut parts = pair.splitn(2, '=');
            if let (Some(k), Some(v)) = (parts.next(), parts.next()) {
                map.insert(decode_component(k), decode_component(v));
            }
        }
    }

    map
}

/// Minimal percent-decoding for query components; '+' counts as space.
fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(byte) = u8::from_str_radix(&raw[i + 1..i + 3], 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}
