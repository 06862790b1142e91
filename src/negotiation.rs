// src/negotiation.rs
use crate::errors::ApiError;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    Accepted,
    Countered,
    TooHigh,
}

/// Outcome of a single counter-offer evaluation. Derived deterministically
/// from the inputs, never persisted as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct NegotiationDecision {
    pub accepted: bool,
    /// Present only when the offer was neither accepted nor rejected outright.
    pub counter_price: Option<Decimal>,
    pub reason: DecisionReason,
}

/// Decide whether to accept a counter offer against a listed rate.
///
/// - at or below the listed rate: accept as-is
/// - more than `tolerance` above the listed rate: reject, no counter
/// - otherwise: propose the midpoint, rounded to cents
///
/// Pure function, safe to call concurrently.
pub fn evaluate(
    listed_rate: Decimal,
    counter_offer: Decimal,
    tolerance: Decimal,
) -> Result<NegotiationDecision, ApiError> {
    if listed_rate <= Decimal::ZERO {
        return Err(ApiError::Validation {
            field: "listed_rate",
            message: "must be a positive number".to_string(),
        });
    }
    if counter_offer <= Decimal::ZERO {
        return Err(ApiError::Validation {
            field: "counter_offer",
            message: "must be a positive number".to_string(),
        });
    }

    if counter_offer <= listed_rate {
        return Ok(NegotiationDecision {
            accepted: true,
            counter_price: None,
            reason: DecisionReason::Accepted,
        });
    }

    let ceiling = listed_rate * (Decimal::ONE + tolerance);
    if counter_offer > ceiling {
        return Ok(NegotiationDecision {
            accepted: false,
            counter_price: None,
            reason: DecisionReason::TooHigh,
        });
    }

    let midpoint = ((listed_rate + counter_offer) / Decimal::TWO).round_dp(2);
    Ok(NegotiationDecision {
        accepted: false,
        counter_price: Some(midpoint),
        reason: DecisionReason::Countered,
    })
}
