//! SSE streaming chat endpoint.
//!
//! POST /chat/stream
//!
//! Resolves the session's trace id and the system prompt, opens a streamed
//! request to the provider, and re-emits each text fragment downstream:
//! - `data: {"content": "<fragment>"}` -- incremental text
//! - `data: [DONE]` -- stream complete
//! - `data: {"error": "<message>"}` -- terminal failure, stream ends
//!
//! Exactly one terminal record is emitted per stream. A completion log line
//! (trace id, user input, truncated output) fires exactly once whether the
//! stream finishes, fails, or the client disconnects mid-flight; disconnect
//! also drops the upstream connection and is not treated as an error.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use tracing::info;

use chatgate_core::llm::provider::{ChatProvider, EventStream};
use chatgate_core::prompt::resolve_system_prompt;
use chatgate_types::chat::{latest_user_content, ChatRequest};
use chatgate_types::llm::{CompletionRequest, StreamEvent};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::extractors::session::SessionId;
use crate::state::AppState;

/// Terminal record of the downstream event stream.
const DONE_EVENT: &str = "[DONE]";

/// How much of the accumulated output the completion log keeps.
const OUTPUT_LOG_LIMIT: usize = 300;

/// Query parameters for the streaming chat endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct StreamQuery {
    /// `?reset=true` drops the session's trace mapping before anything else.
    #[serde(default)]
    pub reset: bool,
}

/// Accumulates the emitted text and logs once on drop.
///
/// Drop covers every way the stream ends: completion, in-stream error, and
/// client disconnect (which drops the relay stream mid-await and, with it,
/// the upstream connection).
struct CompletionLog {
    trace_id: String,
    user_input: String,
    output: String,
}

impl CompletionLog {
    fn new(trace_id: String, user_input: String) -> Self {
        Self {
            trace_id,
            user_input,
            output: String::new(),
        }
    }

    fn push(&mut self, fragment: &str) {
        self.output.push_str(fragment);
    }
}

impl Drop for CompletionLog {
    fn drop(&mut self) {
        info!(
            trace_id = %self.trace_id,
            user_input = %self.user_input,
            output = %truncate_output(&self.output),
            "chat stream finished"
        );
    }
}

/// Truncate accumulated output for the completion log, respecting char
/// boundaries.
fn truncate_output(output: &str) -> String {
    match output.char_indices().nth(OUTPUT_LOG_LIMIT) {
        Some((idx, _)) => format!("{}...", &output[..idx]),
        None => output.to_string(),
    }
}

/// Map provider events to downstream SSE `data` payloads.
///
/// Emits exactly one terminal payload: `[DONE]` on the provider's sentinel
/// (or on an upstream that ends without one), or a single error payload.
/// Dropping the returned stream drops `llm_stream` and the log guard.
fn relay_payloads(llm_stream: EventStream, mut log: CompletionLog) -> impl Stream<Item = String> {
    async_stream::stream! {
        let mut llm_stream = llm_stream;
        let mut had_error = false;

        while let Some(event) = llm_stream.next().await {
            match event {
                Ok(StreamEvent::Delta { text }) => {
                    log.push(&text);
                    yield serde_json::json!({ "content": text }).to_string();
                }
                Ok(StreamEvent::Done) => break,
                Err(e) => {
                    yield serde_json::json!({ "error": e.to_string() }).to_string();
                    had_error = true;
                    break;
                }
            }
        }

        if !had_error {
            yield DONE_EVENT.to_string();
        }
    }
}

/// POST /chat/stream - SSE streaming chat relay.
pub async fn stream_chat(
    State(state): State<AppState>,
    _auth: Authenticated,
    SessionId(session_id): SessionId,
    Query(query): Query<StreamQuery>,
    Json(body): Json<ChatRequest>,
) -> Result<Response, AppError> {
    let messages = body.into_messages();

    if query.reset {
        state.sessions.reset(&session_id);
        // A pure reset carries no usable conversation; acknowledge and stop.
        if latest_user_content(&messages).is_none() {
            return Ok(Json(serde_json::json!({
                "status": "reset",
                "session_id": session_id,
            }))
            .into_response());
        }
    }

    if messages.is_empty() {
        return Err(AppError::Validation("Empty conversation".to_string()));
    }
    let Some(user_input) = latest_user_content(&messages).map(str::to_string) else {
        return Err(AppError::Validation(
            "No valid user message found".to_string(),
        ));
    };

    let trace_id = state
        .sessions
        .get_or_create(&session_id)
        .await
        .map_err(|e| AppError::Internal(format!("trace collector: {e}")))?;

    let system = resolve_system_prompt(state.collector.as_ref(), &state.config.prompt_name).await;

    let request = CompletionRequest {
        model: state.config.model.clone(),
        messages,
        system: Some(system),
        max_tokens: state.config.max_tokens,
        stream: true,
    };

    let llm_stream = state.provider.stream(request);
    let log = CompletionLog::new(trace_id, user_input);

    let sse_stream = relay_payloads(llm_stream, log)
        .map(|payload| Ok::<_, Infallible>(Event::default().data(payload)));

    Ok(Sse::new(sse_stream)
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use futures_util::stream;

    use chatgate_types::llm::LlmError;

    fn log() -> CompletionLog {
        CompletionLog::new("trace-test".to_string(), "hi".to_string())
    }

    fn events(items: Vec<Result<StreamEvent, LlmError>>) -> EventStream {
        Box::pin(stream::iter(items))
    }

    #[tokio::test]
    async fn test_relay_emits_content_then_single_done() {
        let payloads: Vec<String> = relay_payloads(
            events(vec![
                Ok(StreamEvent::Delta { text: "Hel".to_string() }),
                Ok(StreamEvent::Delta { text: "lo".to_string() }),
                Ok(StreamEvent::Done),
            ]),
            log(),
        )
        .collect()
        .await;

        assert_eq!(
            payloads,
            vec![r#"{"content":"Hel"}"#, r#"{"content":"lo"}"#, DONE_EVENT]
        );
    }

    #[tokio::test]
    async fn test_relay_terminates_even_without_sentinel() {
        let payloads: Vec<String> = relay_payloads(
            events(vec![Ok(StreamEvent::Delta { text: "tail".to_string() })]),
            log(),
        )
        .collect()
        .await;

        assert_eq!(payloads, vec![r#"{"content":"tail"}"#, DONE_EVENT]);
    }

    #[tokio::test]
    async fn test_relay_error_is_terminal_and_excludes_done() {
        let payloads: Vec<String> = relay_payloads(
            events(vec![
                Ok(StreamEvent::Delta { text: "part".to_string() }),
                Err(LlmError::Stream("connection reset".to_string())),
            ]),
            log(),
        )
        .collect()
        .await;

        assert_eq!(payloads.len(), 2);
        assert!(payloads[1].contains("\"error\""));
        assert!(payloads[1].contains("connection reset"));
        assert!(!payloads.contains(&DONE_EVENT.to_string()));
    }

    #[tokio::test]
    async fn test_dropping_relay_drops_the_upstream_stream() {
        struct DropFlag(Arc<AtomicBool>);
        impl Drop for DropFlag {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let closed = Arc::new(AtomicBool::new(false));
        let flag = DropFlag(closed.clone());

        // Endless upstream holding the flag; only a drop can end it.
        let upstream: EventStream = Box::pin(async_stream::stream! {
            let _flag = flag;
            loop {
                yield Ok(StreamEvent::Delta { text: "tick".to_string() });
            }
        });

        let mut relay = Box::pin(relay_payloads(upstream, log()));
        let first = relay.next().await;
        assert!(first.is_some());
        assert!(!closed.load(Ordering::SeqCst));

        // Client disconnect: the relay stream is dropped mid-flight.
        drop(relay);
        assert!(
            closed.load(Ordering::SeqCst),
            "upstream must close when the client goes away"
        );
    }

    #[test]
    fn test_truncate_output_short_passthrough() {
        assert_eq!(truncate_output("short"), "short");
        assert_eq!(truncate_output(""), "");
    }

    #[test]
    fn test_truncate_output_caps_and_marks() {
        let long = "a".repeat(OUTPUT_LOG_LIMIT * 2);
        let out = truncate_output(&long);
        assert_eq!(out.len(), OUTPUT_LOG_LIMIT + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_truncate_output_multibyte_safe() {
        let long = "ü".repeat(OUTPUT_LOG_LIMIT + 50);
        let out = truncate_output(&long);
        assert_eq!(out.chars().count(), OUTPUT_LOG_LIMIT + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_stream_query_defaults_to_no_reset() {
        let query: StreamQuery = serde_json::from_str("{}").unwrap();
        assert!(!query.reset);
    }
}
