//! Static access key extractor.
//!
//! Accepts the key from:
//! - `Authorization: Bearer <key>` header
//! - `X-API-Key: <key>` header
//!
//! The expected key is configured once at startup; when none is configured
//! the check is disabled. The comparison happens before any upstream call
//! or trace mutation.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use secrecy::ExposeSecret;

use crate::http::error::AppError;
use crate::state::AppState;

/// Authorized request marker. Extracting this validates the access key.
pub struct Authenticated;

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(ref expected) = state.config.access_key else {
            return Ok(Authenticated);
        };

        let presented = extract_access_key(parts)?;
        if presented == expected.expose_secret() {
            Ok(Authenticated)
        } else {
            Err(AppError::Unauthorized("Invalid access key".to_string()))
        }
    }
}

/// Extract the access key from request headers.
fn extract_access_key(parts: &Parts) -> Result<String, AppError> {
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(key) = auth_str.strip_prefix("Bearer ") {
            return Ok(key.trim().to_string());
        }
    }

    if let Some(key) = parts.headers.get("x-api-key") {
        let key_str = key
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid X-API-Key header encoding".to_string()))?;
        return Ok(key_str.trim().to_string());
    }

    Err(AppError::Unauthorized(
        "Missing access key. Provide via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
    ))
}
