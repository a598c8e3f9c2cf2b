//! LLM request/response types for chatgate.
//!
//! These model the data shapes for the upstream chat-completions provider:
//! the outbound completion request, the events of a streaming response, and
//! provider error handling.

use serde::{Deserialize, Serialize};

use crate::chat::Message;

/// Request to the upstream provider for a streamed completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    /// System prompt, sent as a leading system-role message on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub stream: bool,
}

/// Events emitted while relaying a streaming provider response.
///
/// Errors are not a variant; they travel as the `Err` arm of the stream
/// item so a terminal failure ends the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// An incremental text fragment.
    Delta { text: String },

    /// The provider signalled end of stream.
    Done,
}

/// Errors from the upstream provider.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The request never produced a response (connect failure, timeout).
    #[error("provider request failed: {0}")]
    Http(String),

    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {message}")]
    Provider { status: u16, message: String },

    /// The response stream broke mid-flight.
    #[error("stream error: {0}")]
    Stream(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::MessageRole;

    #[test]
    fn test_completion_request_omits_absent_fields() {
        let request = CompletionRequest {
            model: "llama-3.3-70b-versatile".to_string(),
            messages: vec![Message::new(MessageRole::User, "hi")],
            system: None,
            max_tokens: None,
            stream: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("system").is_none());
        assert!(json.get("max_tokens").is_none());
        assert_eq!(json["stream"], true);
    }

    #[test]
    fn test_stream_event_serde_tag() {
        let event = StreamEvent::Delta {
            text: "hello".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "delta");
        assert_eq!(json["text"], "hello");

        let done: StreamEvent = serde_json::from_str(r#"{"type": "done"}"#).unwrap();
        assert_eq!(done, StreamEvent::Done);
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::Provider {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "provider returned status 429: rate limited");
    }
}
