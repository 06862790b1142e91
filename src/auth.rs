// src/auth.rs
use crate::errors::ApiError;
use astra::Request;
use sha2::{Digest, Sha256};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject the request unless it carries the expected shared-secret header.
pub fn require_api_key(req: &Request, expected: &str) -> Result<(), ApiError> {
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if keys_match(key, expected) => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

/// Compare fixed-size digests so the comparison leaks neither length
/// nor prefix information.
fn keys_match(provided: &str, expected: &str) -> bool {
    let a = Sha256::digest(provided.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    hashes_equal(&a, &b)
}

/// Constant-time-ish compare for hashes (simple and sufficient here).
fn hashes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
