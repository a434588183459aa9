//! Error handling module for the newsdesk front-end.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CORRUPTED: &str = "CORRUPTED";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Application error type.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Missing or placeholder setting
    Config(String),
    /// Remote service answered with a non-success status
    Upstream { status: StatusCode, message: String },
    /// Request never completed
    Transport(String),
    /// Stored value absent
    NotFound(String),
    /// Stored value present but unreadable
    Corrupted(String),
    /// Bad request
    BadRequest(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream { status, .. } => *status,
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Corrupted(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => codes::CONFIG_ERROR,
            AppError::Upstream { .. } => codes::UPSTREAM_ERROR,
            AppError::Transport(_) => codes::TRANSPORT_ERROR,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Corrupted(_) => codes::CORRUPTED,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Config(msg) => msg.clone(),
            AppError::Upstream { message, .. } => message.clone(),
            AppError::Transport(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Corrupted(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }

    /// Build an upstream error from a non-success response body.
    ///
    /// Uses the service-provided message when the body carries one, otherwise a generic
    /// status line.
    pub fn upstream(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|value| extract_message(&value))
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
        AppError::Upstream { status, message }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::warn!("Transport error: {:?}", err);
        match err.status() {
            Some(status) => AppError::Upstream {
                status,
                message: format!("Request failed with status code {}", status.as_u16()),
            },
            None => AppError::Transport(format!("Network error: {}", err)),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        tracing::error!("Template error: {:?}", err);
        AppError::Internal(format!("Template error: {}", err))
    }
}

/// Pull a human-readable message out of a remote error body.
///
/// Understands `{"error": {"message": ..}}`, `{"message": ..}` and `{"error": ".."}`.
pub fn extract_message(body: &Value) -> Option<String> {
    body.pointer("/error/message")
        .or_else(|| body.get("message"))
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            error: error.message(),
            code: error.error_code().to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::new(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_nested_message() {
        let body = json!({ "error": { "code": "invalid_access_key", "message": "bad key" } });
        assert_eq!(extract_message(&body).as_deref(), Some("bad key"));
    }

    #[test]
    fn test_extract_flat_message() {
        let body = json!({ "status": "error", "message": "rate limited" });
        assert_eq!(extract_message(&body).as_deref(), Some("rate limited"));
        assert_eq!(
            extract_message(&json!({ "error": "nope" })).as_deref(),
            Some("nope")
        );
        assert!(extract_message(&json!({ "ok": false })).is_none());
    }

    #[test]
    fn test_upstream_falls_back_to_status_line() {
        let err = AppError::upstream(StatusCode::SERVICE_UNAVAILABLE, b"<html>down</html>");
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.message(), "Request failed with status code 503");
    }

    #[test]
    fn test_upstream_uses_service_message() {
        let err = AppError::upstream(StatusCode::NOT_FOUND, br#"{"message":"Post 9 missing"}"#);
        assert_eq!(err.message(), "Post 9 missing");
        assert_eq!(err.error_code(), codes::UPSTREAM_ERROR);
    }
}
