//! Landing and health endpoints.

use axum::Json;
use serde_json::{json, Value};

/// GET / - Static status payload for the landing route.
pub async fn index() -> Json<Value> {
    Json(json!({
        "service": "chatgate",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health - Simple health check endpoint (no auth required).
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
