use thiserror::Error;

/// Errors from trace collector operations.
///
/// Collector calls are opaque and never retried; callers either surface the
/// failure or fall back (the system prompt has a fixed default).
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("collector request failed: {0}")]
    Http(String),

    #[error("collector returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("collector response could not be decoded: {0}")]
    Deserialization(String),
}
