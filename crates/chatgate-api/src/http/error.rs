//! Application error type mapping to HTTP status codes.
//!
//! Pre-stream failures are ordinary JSON bodies of the form
//! `{"error": "<message>"}` -- a human-readable message, no error codes.
//! Failures after the stream has opened are in-stream events instead and
//! never pass through this type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors detected before streaming begins.
#[derive(Debug)]
pub enum AppError {
    /// Access key missing or wrong.
    Unauthorized(String),
    /// No `X-Session-Id` header on a request that requires one.
    MissingSession,
    /// Bad request body (empty conversation, no user message).
    Validation(String),
    /// Anything else, including collector failures.
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::MissingSession => (
                StatusCode::BAD_REQUEST,
                "Missing X-Session-Id header".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let resp = AppError::Unauthorized("invalid access key".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = AppError::MissingSession.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::Validation("Empty conversation".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::Internal("boom".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
