//! HTTP layer for chatgate.
//!
//! Axum router with the streaming chat endpoint, static-key access check,
//! session header extraction, and CORS open to any origin.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
