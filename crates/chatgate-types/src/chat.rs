//! Conversation types accepted from the browser client.
//!
//! The chat endpoint accepts either a bare JSON array of messages or an
//! object wrapping the array under a `conversation` key. Both shapes
//! normalize to `Vec<Message>` and are immutable once received.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat/stream`.
///
/// Clients send either `[{"role": ...}, ...]` or
/// `{"conversation": [{"role": ...}, ...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChatRequest {
    Bare(Vec<Message>),
    Wrapped { conversation: Vec<Message> },
}

impl ChatRequest {
    /// Normalize both accepted shapes to the message list.
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            ChatRequest::Bare(messages) => messages,
            ChatRequest::Wrapped { conversation } => conversation,
        }
    }
}

/// Content of the most recent user message with non-empty content, if any.
///
/// Used both for input validation and for the post-stream completion log.
pub fn latest_user_content(messages: &[Message]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == MessageRole::User && !m.content.trim().is_empty())
        .map(|m| m.content.as_str())
}
