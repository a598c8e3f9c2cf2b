//! System prompt resolution.
//!
//! The system prompt is managed in the collector's prompt registry so it can
//! change without a redeploy. Any failure falls back to a fixed default.

use tracing::debug;

use crate::session::TraceCollector;

/// Fallback system prompt when the collector has none.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Fetch the named prompt from the collector, falling back to
/// [`DEFAULT_SYSTEM_PROMPT`] on failure or an empty registry entry.
pub async fn resolve_system_prompt<C: TraceCollector>(collector: &C, name: &str) -> String {
    match collector.get_prompt(name).await {
        Ok(prompt) if !prompt.trim().is_empty() => prompt,
        Ok(_) => {
            debug!(name, "collector prompt is empty, using default");
            DEFAULT_SYSTEM_PROMPT.to_string()
        }
        Err(e) => {
            debug!(name, error = %e, "collector prompt unavailable, using default");
            DEFAULT_SYSTEM_PROMPT.to_string()
        }
    }
}
