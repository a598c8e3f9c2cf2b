//! Provider SSE payload to [`StreamEvent`] adapter.
//!
//! The provider emits SSE records whose `data` payload is either a
//! chat-completion chunk (JSON with `choices[0].delta.content`) or the
//! literal `[DONE]` sentinel. This adapter consumes the payloads as a lazy
//! one-shot sequence and yields relay events; dropping the returned stream
//! drops the source, which closes the upstream connection.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use tracing::debug;

use chatgate_types::llm::{LlmError, StreamEvent};

/// Literal end-of-stream marker in the provider's framing.
pub const DONE_SENTINEL: &str = "[DONE]";

/// One chat-completion chunk. Only the text delta is consumed.
#[derive(Debug, Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionChunk {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
    }
}

/// Map a stream of SSE `data` payloads to relay events.
///
/// A payload that fails to parse as chunk JSON is skipped without ending
/// the relay. The stream ends after the first `Done` or `Err` item;
/// payloads after the sentinel are never read.
pub fn map_chunk_stream<S>(
    payloads: S,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>
where
    S: Stream<Item = Result<String, LlmError>> + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut payloads = std::pin::pin!(payloads);

        while let Some(item) = payloads.next().await {
            match item {
                Ok(data) => {
                    if data.trim() == DONE_SENTINEL {
                        yield Ok(StreamEvent::Done);
                        break;
                    }
                    match serde_json::from_str::<CompletionChunk>(&data) {
                        Ok(chunk) => {
                            if let Some(text) = chunk.into_text() {
                                if !text.is_empty() {
                                    yield Ok(StreamEvent::Delta { text });
                                }
                            }
                        }
                        Err(e) => debug!(error = %e, "skipping malformed stream chunk"),
                    }
                }
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    })
}
