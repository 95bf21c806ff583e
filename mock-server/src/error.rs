use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error returned by every handler.
///
/// Most failures use the `{"message", "statusCode"}` shape; validation
/// failures use `{"errors": [{"message"}]}` like the real backend's
/// validation pipe.
#[derive(Debug, thiserror::Error)]
#[error("{status}: {message}")]
pub struct ApiFailure {
    pub status: StatusCode,
    pub message: String,
    validation: bool,
}

impl ApiFailure {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            validation: false,
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{what} not found"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            validation: true,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = if self.validation {
            json!({ "errors": [{ "message": self.message }] })
        } else {
            json!({ "message": self.message, "statusCode": self.status.as_u16() })
        };
        (self.status, Json(body)).into_response()
    }
}

/// Reject a missing or blank required field.
pub fn required(value: Option<String>, field: &str) -> Result<String, ApiFailure> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiFailure::validation(format!("{field} is required")))
}
