//! Axum router configuration with middleware.
//!
//! Middleware: CORS (any origin, the browser UI is served elsewhere) and
//! per-request tracing. The access check is an extractor on the chat
//! handler, not a layer, so `/` and `/health` stay open.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::status::index))
        .route("/health", get(handlers::status::health_check))
        .route("/chat/stream", post(handlers::chat::stream_chat))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
