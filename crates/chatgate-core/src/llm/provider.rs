//! ChatProvider trait definition.
//!
//! The single abstraction over the upstream chat-completions endpoint.
//! The concrete implementation lives in chatgate-infra.

use std::pin::Pin;

use futures_util::Stream;

use chatgate_types::llm::{CompletionRequest, LlmError, StreamEvent};

/// A boxed stream of relay events, one per upstream fragment.
///
/// The stream is finite, one-shot, and non-restartable. Dropping it closes
/// the upstream connection, which is how downstream cancellation propagates.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Trait for the upstream chat-completions provider.
///
/// `stream` returns a boxed stream rather than RPITIT so the handler can
/// hold it as a plain value across the SSE response lifetime.
pub trait ChatProvider: Send + Sync {
    /// Human-readable provider name for logs.
    fn name(&self) -> &str;

    /// Open a streamed completion request.
    ///
    /// Transport-level failures are reported as the first (and only) item
    /// of the returned stream, never as a panic or a hung future.
    fn stream(&self, request: CompletionRequest) -> EventStream;
}
