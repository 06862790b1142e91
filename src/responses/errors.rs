use crate::errors::ApiError;
use astra::{Body, Response, ResponseBuilder};
use serde_json::json;

/// Convert an ApiError into the structured JSON error response.
/// Storage and internal failures are logged here so nothing is swallowed.
pub fn error_to_response(err: ApiError) -> Response {
    match &err {
        ApiError::Storage(msg) | ApiError::Internal(msg) => {
            tracing::error!(kind = err.kind(), "{msg}");
        }
        ApiError::Upstream(msg) => {
            tracing::warn!(kind = err.kind(), "{msg}");
        }
        _ => {}
    }

    let body = json!({
        "error": {
            "kind": err.kind(),
            "message": err.to_string(),
        }
    });

    ResponseBuilder::new()
        .status(err.status())
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body.to_string()))
        .unwrap_or_else(|_| Response::new(Body::from("internal server error")))
}
