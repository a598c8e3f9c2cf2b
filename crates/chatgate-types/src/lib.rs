//! Shared domain types for chatgate.
//!
//! This crate has no I/O and no async. It defines the message and request
//! shapes exchanged with the browser client, the provider-facing completion
//! request, the streaming event enum, and the error enums used across the
//! workspace.

pub mod chat;
pub mod error;
pub mod llm;
