use astra::Response;
use std::fmt;

/// Errors surfaced by route handlers and the layers below them:
/// auth, input validation, storage, and the FMCSA lookup.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    NotFound(String),
    BadRequest(String),
    Validation { field: &'static str, message: String },
    Storage(String),
    Upstream(String),
    Internal(String),
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ApiError>;

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Unauthorized => 401,
            ApiError::NotFound(_) => 404,
            ApiError::BadRequest(_) | ApiError::Validation { .. } => 400,
            ApiError::Storage(_) | ApiError::Internal(_) => 500,
            ApiError::Upstream(_) => 502,
        }
    }

    /// Machine-readable tag carried in the JSON error body.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Validation { .. } => "validation",
            ApiError::Storage(_) => "storage",
            ApiError::Upstream(_) => "upstream",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "Invalid or missing API key"),
            ApiError::NotFound(msg) => write!(f, "{msg}"),
            ApiError::BadRequest(msg) => write!(f, "{msg}"),
            ApiError::Validation { field, message } => write!(f, "{field}: {message}"),
            ApiError::Storage(msg) => write!(f, "Storage error: {msg}"),
            ApiError::Upstream(msg) => write!(f, "{msg}"),
            ApiError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}
