//! Business logic and trait seams for chatgate.
//!
//! This crate defines the "ports" that the infrastructure layer implements:
//! the chat provider and trace collector traits, the session-trace store,
//! and system prompt resolution. It depends only on `chatgate-types` --
//! never on `chatgate-infra` or any HTTP crate.

pub mod llm;
pub mod prompt;
pub mod session;
