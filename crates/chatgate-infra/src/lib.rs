//! Infrastructure layer for chatgate.
//!
//! Contains implementations of the trait seams defined in `chatgate-core`:
//! the reqwest-based chat-completions provider with SSE decoding, the HTTP
//! trace collector client, and environment configuration.

pub mod config;
pub mod llm;
pub mod trace;
