//! `X-Session-Id` header extractor.
//!
//! The session id is an opaque caller-supplied string grouping requests
//! into one logical conversation for tracing. A request that requires one
//! and lacks it fails with a client error before anything else happens.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::http::error::AppError;

/// Caller-declared session identifier.
pub struct SessionId(pub String);

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-session-id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| SessionId(value.to_string()))
            .ok_or(AppError::MissingSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<SessionId, AppError> {
        let mut builder = Request::builder().uri("/chat/stream");
        if let Some(value) = header {
            builder = builder.header("x-session-id", value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        SessionId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_header_value_extracted_trimmed() {
        let session = extract(Some("  sess-42  ")).await.unwrap();
        assert_eq!(session.0, "sess-42");
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        assert!(matches!(extract(None).await, Err(AppError::MissingSession)));
    }

    #[tokio::test]
    async fn test_blank_header_rejected() {
        assert!(matches!(
            extract(Some("   ")).await,
            Err(AppError::MissingSession)
        ));
    }
}
