//! Error handling for the Task Manager client

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Unified error type for the Task Manager client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP transport errors (the request never completed)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Authentication errors (401 or rejected credentials)
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation errors (400-class), optionally naming the offending field
    #[error("validation error: {message}")]
    Validation {
        /// Field the backend pointed at, when it named one
        field: Option<String>,
        /// Human-readable description
        message: String,
    },

    /// Permission errors (403)
    #[error("permission denied: {0}")]
    Permission(String),

    /// Missing resource errors (404)
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success API response
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(field: Option<String>, msg: T) -> Self {
        Error::Validation {
            field,
            message: msg.to_string(),
        }
    }

    /// Create a new permission error
    pub fn permission<T: fmt::Display>(msg: T) -> Self {
        Error::Permission(msg.to_string())
    }

    /// Create a new not-found error
    pub fn not_found<T: fmt::Display>(msg: T) -> Self {
        Error::NotFound(msg.to_string())
    }

    /// Whether this error came from the 401 path
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// Map a non-success HTTP status and response body to an error variant.
    ///
    /// The backend reports failures as `{"detail": ...}` where `detail` is
    /// either a message string or a list of `{loc, msg}` entries for field
    /// validation.
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let (field, message) = parse_detail(body, status);
        match status {
            StatusCode::UNAUTHORIZED => Error::Auth(message),
            StatusCode::FORBIDDEN => Error::Permission(message),
            StatusCode::NOT_FOUND => Error::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Error::Validation { field, message }
            }
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Extract the offending field (if any) and a message from an error body.
fn parse_detail(body: &str, status: StatusCode) -> (Option<String>, String) {
    let fallback = || {
        if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body.to_string()
        }
    };

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return (None, fallback());
    };

    match value.get("detail") {
        Some(serde_json::Value::String(message)) => (None, message.clone()),
        Some(serde_json::Value::Array(entries)) => {
            let first = entries.first();
            let field = first
                .and_then(|e| e.get("loc"))
                .and_then(|loc| loc.as_array())
                .and_then(|loc| loc.last())
                .and_then(|f| f.as_str())
                .map(str::to_string);
            let message = first
                .and_then(|e| e.get("msg"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(fallback);
            (field, message)
        }
        _ => (None, fallback()),
    }
}
