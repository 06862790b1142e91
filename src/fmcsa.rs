// src/fmcsa.rs
//
// One bounded outbound lookup against the FMCSA carrier registry. The
// registry's payload shape varies, so the parser hunts for the carrier
// block and normalizes the status fields it finds.
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum FmcsaError {
    NotFound,
    Unavailable(String),
}

impl fmt::Display for FmcsaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FmcsaError::NotFound => write!(f, "Carrier not found"),
            FmcsaError::Unavailable(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FmcsaError {}

#[derive(Debug, Clone, Serialize)]
pub struct CarrierRecord {
    pub mc: String,
    pub dot_number: Option<String>,
    pub carrier_name: Option<String>,
    pub authority_status: Option<String>,
    pub eligible: bool,
}

/// Fetch carrier details by MC (docket) number. Timeouts and upstream
/// errors surface as `Unavailable`, never a panic.
pub fn fetch_carrier_by_mc(mc: &str, web_key: &str) -> Result<CarrierRecord, FmcsaError> {
    if web_key.is_empty() {
        return Err(FmcsaError::Unavailable(
            "FMCSA web key is not configured".to_string(),
        ));
    }

    let url =
        format!("https://mobile.fmcsa.dot.gov/qc/services/carriers/docket-number/{mc}?webKey={web_key}");

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .build()
        .map_err(|e| FmcsaError::Unavailable(format!("http client setup failed: {e}")))?;

    let response = client
        .get(&url)
        .send()
        .map_err(|e| FmcsaError::Unavailable(format!("failed to reach FMCSA service: {e}")))?;

    let status = response.status();
    tracing::info!(mc, status = status.as_u16(), "FMCSA lookup");

    if status.as_u16() == 404 {
        return Err(FmcsaError::NotFound);
    }
    if status.is_server_error() {
        return Err(FmcsaError::Unavailable(
            "FMCSA service returned an error".to_string(),
        ));
    }

    let payload: Value = response
        .json()
        .map_err(|_| FmcsaError::Unavailable("FMCSA response was not valid JSON".to_string()))?;

    if !status.is_success() {
        return Err(FmcsaError::Unavailable(
            "FMCSA service returned an unexpected response".to_string(),
        ));
    }

    parse_carrier_payload(&payload, mc)
}

pub fn parse_carrier_payload(payload: &Value, mc: &str) -> Result<CarrierRecord, FmcsaError> {
    let root = payload.get("content").unwrap_or(payload);
    let carrier = find_carrier_block(root).ok_or(FmcsaError::NotFound)?;

    let dot_number = ["usdotNumber", "usDotNumber", "dotNumber", "US_DOT"]
        .iter()
        .find_map(|key| value_str(carrier.get(*key)));
    let carrier_name = ["legalName", "carrierName", "dbaName"]
        .iter()
        .find_map(|key| value_str(carrier.get(*key)));

    let authority_status = normalize_authority_status(carrier);
    let eligible = determine_eligibility(carrier, authority_status.as_deref());

    Ok(CarrierRecord {
        mc: mc.to_string(),
        dot_number,
        carrier_name,
        authority_status,
        eligible,
    })
}

/// Trimmed, non-empty text of a string or number value.
fn value_str(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn looks_like_carrier_block(map: &Map<String, Value>) -> bool {
    const CARRIER_KEYS: &[&str] = &[
        "usdotnumber",
        "dotnumber",
        "legalname",
        "carriername",
        "dba",
        "operatingstatus",
        "authoritystatus",
        "authoritydescription",
        "operatingstatusdesc",
    ];
    map.keys()
        .any(|key| CARRIER_KEYS.contains(&key.to_lowercase().as_str()))
}

fn find_carrier_block(payload: &Value) -> Option<&Map<String, Value>> {
    match payload {
        Value::Object(map) => {
            if let Some(Value::Object(carrier)) = map.get("carrier") {
                if !carrier.is_empty() {
                    return Some(carrier);
                }
            }
            if looks_like_carrier_block(map) {
                return Some(map);
            }
            map.values().find_map(find_carrier_block)
        }
        Value::Array(items) => items.iter().find_map(find_carrier_block),
        _ => None,
    }
}

fn expand_status_code(code: Option<&Value>) -> Option<String> {
    let extracted = value_str(code)?;
    let expanded = match extracted.to_lowercase().as_str() {
        "a" => "Active",
        "i" | "n" => "Inactive",
        "o" => "Out of Service",
        "s" => "Suspended",
        "v" => "Inactive (voluntary)",
        "p" => "Pending",
        "r" => "Revoked",
        _ => return Some(extracted),
    };
    Some(expanded.to_string())
}

fn interpret_allowed_flag(value: Option<&Value>) -> Option<String> {
    let extracted = value_str(value)?;
    let normalized = extracted.to_lowercase();
    if ["y", "yes", "true", "1"].contains(&normalized.as_str()) {
        Some("Allowed to operate".to_string())
    } else if ["n", "no", "false", "0"].contains(&normalized.as_str()) {
        Some("Not allowed to operate".to_string())
    } else {
        Some(format!("Allowed to operate: {extracted}"))
    }
}

fn status_text_indicates_active(status: Option<&str>) -> bool {
    let Some(status) = status else {
        return false;
    };
    let normalized = status.to_lowercase();
    if normalized.contains("inactive") || normalized.contains("revoked") {
        return false;
    }
    if normalized.contains("not") && normalized.contains("authorized") {
        return false;
    }
    normalized.contains("active")
        || normalized.contains("authorized")
        || normalized.contains("allowed")
}

fn normalize_authority_status(carrier: &Map<String, Value>) -> Option<String> {
    let mut fragments: Vec<String> = Vec::new();

    for key in [
        "operatingStatus",
        "authorityStatus",
        "authorityDescription",
        "operatingStatusDesc",
    ] {
        if let Some(text) = value_str(carrier.get(key)) {
            fragments.push(text);
            break;
        }
    }

    for (label, key) in [
        ("Status", "statusCode"),
        ("Common", "commonAuthorityStatus"),
        ("Contract", "contractAuthorityStatus"),
        ("Broker", "brokerAuthorityStatus"),
    ] {
        if let Some(expanded) = expand_status_code(carrier.get(key)) {
            fragments.push(format!("{label}: {expanded}"));
        }
    }

    if let Some(allowed) = interpret_allowed_flag(carrier.get("allowedToOperate")) {
        fragments.push(allowed);
    }

    let mut unique: Vec<String> = Vec::new();
    for fragment in fragments {
        if !unique.contains(&fragment) {
            unique.push(fragment);
        }
    }

    if unique.is_empty() {
        None
    } else {
        Some(unique.join("; "))
    }
}

fn determine_eligibility(carrier: &Map<String, Value>, status_text: Option<&str>) -> bool {
    if status_text_indicates_active(status_text) {
        return true;
    }

    if let Some(flag) = value_str(carrier.get("allowedToOperate")) {
        if ["y", "yes", "true", "1"].contains(&flag.to_lowercase().as_str()) {
            return true;
        }
    }

    for key in [
        "statusCode",
        "commonAuthorityStatus",
        "contractAuthorityStatus",
        "brokerAuthorityStatus",
    ] {
        let Some(code) = value_str(carrier.get(key)) else {
            continue;
        };
        let normalized = code.to_lowercase();
        if normalized.starts_with('a') || normalized == "yes" {
            return true;
        }
        if normalized.starts_with('i') || normalized.starts_with('r') || normalized.starts_with('s')
        {
            return false;
        }
    }

    false
}
