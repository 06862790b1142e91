// src/db/events.rs
//
// Append-only store of negotiation outcomes. Each event is one INSERT
// (atomic in SQLite); there is no update or delete path.
use crate::db::connection::Database;
use crate::errors::ApiError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::params;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSentiment {
    Positive,
    Neutral,
    Negative,
}

impl CallSentiment {
    /// Case-insensitive parse; surrounding whitespace ignored.
    pub fn parse(raw: &str) -> Option<CallSentiment> {
        match raw.trim().to_lowercase().as_str() {
            "positive" => Some(CallSentiment::Positive),
            "neutral" => Some(CallSentiment::Neutral),
            "negative" => Some(CallSentiment::Negative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallSentiment::Positive => "positive",
            CallSentiment::Neutral => "neutral",
            CallSentiment::Negative => "negative",
        }
    }
}

/// A validated negotiation outcome, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub load_accepted: bool,
    pub posted_price: Decimal,
    pub final_price: Decimal,
    pub total_negotiations: i64,
    pub call_sentiment: CallSentiment,
    pub commodity: String,
}

/// Wire shape of a stored event. `recorded_at` is ISO-8601 UTC.
#[derive(Debug, Clone, Serialize)]
pub struct StoredEvent {
    pub id: i64,
    pub load_accepted: bool,
    pub posted_price: f64,
    pub final_price: f64,
    pub total_negotiations: i64,
    pub call_sentiment: String,
    pub commodity: String,
    pub recorded_at: String,
}

impl NewEvent {
    /// Parse the loose-typed capture payload: booleans and numbers may
    /// arrive either as native JSON values or as strings, and are
    /// normalized here. Errors name the offending field.
    pub fn from_payload(payload: &Value) -> Result<NewEvent, ApiError> {
        let obj = payload.as_object().ok_or_else(|| {
            ApiError::BadRequest("request body must be a JSON object".to_string())
        })?;

        let field = |name: &'static str| -> Result<&Value, ApiError> {
            obj.get(name).ok_or(ApiError::Validation {
                field: name,
                message: "is required".to_string(),
            })
        };

        let posted_price = parse_price(field("posted_price")?, "posted_price")?;
        let final_price = parse_price(field("final_price")?, "final_price")?;

        Ok(NewEvent {
            load_accepted: parse_bool(field("load_accepted")?, "load_accepted")?,
            posted_price,
            final_price,
            total_negotiations: parse_count(field("total_negotiations")?, "total_negotiations")?,
            call_sentiment: parse_sentiment(field("call_sentiment")?)?,
            commodity: parse_text(field("commodity")?, "commodity")?,
        })
    }

    pub fn into_stored(self, id: i64, recorded_at: DateTime<Utc>) -> Result<StoredEvent, ApiError> {
        Ok(StoredEvent {
            id,
            load_accepted: self.load_accepted,
            posted_price: decimal_to_f64(self.posted_price)?,
            final_price: decimal_to_f64(self.final_price)?,
            total_negotiations: self.total_negotiations,
            call_sentiment: self.call_sentiment.as_str().to_string(),
            commodity: self.commodity,
            recorded_at: recorded_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }
}

fn decimal_to_f64(value: Decimal) -> Result<f64, ApiError> {
    value
        .to_f64()
        .ok_or_else(|| ApiError::Internal(format!("decimal {value} not representable as f64")))
}

fn parse_bool(value: &Value, field: &'static str) -> Result<bool, ApiError> {
    if let Some(b) = value.as_bool() {
        return Ok(b);
    }
    if let Some(s) = value.as_str() {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => return Ok(true),
            "false" | "0" | "no" | "n" => return Ok(false),
            _ => {}
        }
    }
    Err(ApiError::Validation {
        field,
        message: "must be 'true' or 'false'".to_string(),
    })
}

fn parse_price(value: &Value, field: &'static str) -> Result<Decimal, ApiError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64().and_then(|f| Decimal::try_from(f).ok()),
        Value::String(s) => Decimal::from_str(s.replace(',', "").trim()).ok(),
        _ => None,
    };

    match parsed {
        Some(d) if d > Decimal::ZERO => Ok(d),
        Some(_) => Err(ApiError::Validation {
            field,
            message: "must be strictly positive".to_string(),
        }),
        None => Err(ApiError::Validation {
            field,
            message: "must be a numeric price".to_string(),
        }),
    }
}

fn parse_count(value: &Value, field: &'static str) -> Result<i64, ApiError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n >= 0 => Ok(n),
        Some(_) => Err(ApiError::Validation {
            field,
            message: "must not be negative".to_string(),
        }),
        None => Err(ApiError::Validation {
            field,
            message: "must be an integer".to_string(),
        }),
    }
}

fn parse_sentiment(value: &Value) -> Result<CallSentiment, ApiError> {
    value
        .as_str()
        .and_then(CallSentiment::parse)
        .ok_or(ApiError::Validation {
            field: "call_sentiment",
            message: "must be one of positive, neutral, negative".to_string(),
        })
}

fn parse_text(value: &Value, field: &'static str) -> Result<String, ApiError> {
    match value.as_str().map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(ApiError::Validation {
            field,
            message: "must be a non-empty string".to_string(),
        }),
    }
}

/// Append one event with the server-assigned timestamp; returns the new
/// row id. A single INSERT, so a failure persists nothing.
pub fn insert_event(
    db: &Database,
    event: &NewEvent,
    recorded_at: DateTime<Utc>,
) -> Result<i64, ApiError> {
    db.with_conn(|conn| {
        conn.execute(
            r#"
            insert into negotiations
                (load_accepted, posted_price, final_price,
                 total_negotiations, call_sentiment, commodity, recorded_at)
            values (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                event.load_accepted,
                event.posted_price.to_string(),
                event.final_price.to_string(),
                event.total_negotiations,
                event.call_sentiment.as_str(),
                event.commodity,
                recorded_at,
            ],
        )
        .map_err(|e| ApiError::Storage(format!("insert negotiation failed: {e}")))?;

        let id = conn.last_insert_rowid();
        tracing::info!(id, "negotiation event recorded");
        Ok(id)
    })
}

/// Return events in insertion order (ascending id), optionally filtered
/// by whether the load was accepted.
pub fn list_events(db: &Database, accepted: Option<bool>) -> Result<Vec<StoredEvent>, ApiError> {
    db.with_conn(|conn| {
        let mut sql = String::from(
            "select id, load_accepted, posted_price, final_price, \
             total_negotiations, call_sentiment, commodity, recorded_at \
             from negotiations",
        );
        if accepted.is_some() {
            sql.push_str(" where load_accepted = ?1");
        }
        sql.push_str(" order by id asc");

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        let map_row = |row: &rusqlite::Row| -> rusqlite::Result<RawEventRow> {
            Ok(RawEventRow {
                id: row.get(0)?,
                load_accepted: row.get(1)?,
                posted_price: row.get(2)?,
                final_price: row.get(3)?,
                total_negotiations: row.get(4)?,
                call_sentiment: row.get(5)?,
                commodity: row.get(6)?,
                recorded_at: row.get(7)?,
            })
        };

        let rows = match accepted {
            Some(flag) => stmt.query_map(params![flag], map_row),
            None => stmt.query_map([], map_row),
        }
        .map_err(|e| ApiError::Storage(e.to_string()))?;

        let mut events = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| ApiError::Storage(e.to_string()))?;
            events.push(raw.into_stored()?);
        }
        Ok(events)
    })
}

pub fn count_events(db: &Database) -> Result<i64, ApiError> {
    db.with_conn(|conn| {
        conn.query_row("select count(*) from negotiations", [], |row| row.get(0))
            .map_err(|e| ApiError::Storage(e.to_string()))
    })
}

struct RawEventRow {
    id: i64,
    load_accepted: bool,
    posted_price: String,
    final_price: String,
    total_negotiations: i64,
    call_sentiment: String,
    commodity: String,
    recorded_at: DateTime<Utc>,
}

impl RawEventRow {
    fn into_stored(self) -> Result<StoredEvent, ApiError> {
        let parse_price = |raw: &str| -> Result<f64, ApiError> {
            raw.parse::<f64>()
                .map_err(|e| ApiError::Storage(format!("stored price '{raw}' unreadable: {e}")))
        };

        Ok(StoredEvent {
            id: self.id,
            load_accepted: self.load_accepted,
            posted_price: parse_price(&self.posted_price)?,
            final_price: parse_price(&self.final_price)?,
            total_negotiations: self.total_negotiations,
            call_sentiment: self.call_sentiment,
            commodity: self.commodity,
            recorded_at: self.recorded_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }
}
