//! Error types for the ombudsman API client.
//!
//! # Design
//! The client recovers locally from exactly one failure, an expired access
//! token, and turns everything else into one of these variants for the
//! caller to render. `SessionExpired` is the only variant that comes with a
//! side effect (the session has already been cleared and the listener told).
//! Other non-2xx responses land in `Http` with a human-readable message pulled
//! out of the response body by `extract_message`.

use serde_json::Value;

use crate::http::HttpResponse;

/// Message used when a failed response carries nothing readable.
pub const UNKNOWN_SERVER_ERROR: &str = "Unknown server error";

/// Errors returned by the authenticated client and the service operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The access token expired and could not be renewed. The session has
    /// been cleared and the user must log in again.
    #[error("session expired, please login again")]
    SessionExpired,

    /// The server answered with a non-2xx status other than a recoverable 401.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// No response was received (connection failure or timeout).
    #[error("network error: {0}")]
    Network(String),

    /// Login succeeded but the account is deactivated; no session was stored.
    #[error("account is inactive, please contact the administrator")]
    AccountInactive,

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

impl ApiError {
    /// Build an `Http` error from a failed response.
    pub fn from_response(response: &HttpResponse) -> Self {
        ApiError::Http {
            status: response.status,
            message: extract_message(&response.body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::SessionExpired => Some(401),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Http { status: 404, .. })
    }
}

/// Pull a display message out of an error body.
///
/// JSON objects are searched in order: `message`, `error`,
/// `errors[0].message`, `detail`. Empty strings count as missing. A bare JSON
/// string or a non-JSON body is used as-is; anything else yields
/// `UNKNOWN_SERVER_ERROR`.
pub fn extract_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return UNKNOWN_SERVER_ERROR.to_string();
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => {
            let candidates = [
                map.get("message"),
                map.get("error"),
                map.get("errors")
                    .and_then(|errors| errors.get(0))
                    .and_then(|first| first.get("message")),
                map.get("detail"),
            ];
            candidates
                .into_iter()
                .flatten()
                .filter_map(Value::as_str)
                .find(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_SERVER_ERROR)
                .to_string()
        }
        Ok(Value::String(s)) if !s.is_empty() => s,
        Ok(_) => UNKNOWN_SERVER_ERROR.to_string(),
        Err(_) => trimmed.to_string(),
    }
}
