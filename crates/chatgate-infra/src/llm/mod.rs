//! ChatCompletionsProvider -- concrete [`ChatProvider`] for any
//! OpenAI-compatible chat-completions endpoint.
//!
//! Sends `POST {base_url}/chat/completions` with bearer auth and
//! `stream: true`, decodes the response with `eventsource-stream`, and maps
//! the SSE payloads to relay events via [`streaming::map_chunk_stream`].
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

pub mod streaming;

use std::time::Duration;

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use chatgate_core::llm::provider::{ChatProvider, EventStream};
use chatgate_types::chat::{Message, MessageRole};
use chatgate_types::llm::{CompletionRequest, LlmError};

/// Cap on how much of a provider error body is carried into the error.
const ERROR_DETAIL_LIMIT: usize = 300;

/// Wire shape of the outbound request body.
#[derive(Debug, Serialize)]
struct ChatCompletionsBody {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// OpenAI-compatible chat-completions provider.
///
/// Does NOT derive Debug to prevent accidental exposure of the API key.
pub struct ChatCompletionsProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl ChatCompletionsProvider {
    /// Create a new provider.
    ///
    /// `read_timeout` bounds the wait for each chunk of the streamed
    /// response; there is no whole-request timeout because generation
    /// length is open-ended.
    pub fn new(api_key: SecretString, base_url: String, read_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .read_timeout(read_timeout)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Fold the system prompt in as a leading system-role message.
fn build_wire_messages(request: &CompletionRequest) -> Vec<Message> {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(ref system) = request.system {
        messages.push(Message::new(MessageRole::System, system.clone()));
    }
    messages.extend(request.messages.iter().cloned());
    messages
}

/// Truncate an error body to a loggable size, respecting char boundaries.
fn truncate_detail(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(ERROR_DETAIL_LIMIT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

impl ChatProvider for ChatCompletionsProvider {
    fn name(&self) -> &str {
        "chat-completions"
    }

    fn stream(&self, request: CompletionRequest) -> EventStream {
        let client = self.client.clone();
        let url = self.completions_url();
        let api_key = self.api_key.clone();

        Box::pin(async_stream::stream! {
            let body = ChatCompletionsBody {
                model: request.model.clone(),
                messages: build_wire_messages(&request),
                stream: true,
                max_tokens: request.max_tokens,
            };

            let response = match client
                .post(&url)
                .bearer_auth(api_key.expose_secret())
                .json(&body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    yield Err(LlmError::Http(e.to_string()));
                    return;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let detail = response.text().await.unwrap_or_default();
                yield Err(LlmError::Provider {
                    status: status.as_u16(),
                    message: truncate_detail(&detail),
                });
                return;
            }

            let payloads = response.bytes_stream().eventsource().map(|item| match item {
                Ok(event) => Ok(event.data),
                Err(e) => Err(LlmError::Stream(e.to_string())),
            });

            let mut events = streaming::map_chunk_stream(payloads);
            while let Some(event) = events.next().await {
                yield event;
            }
        })
    }
}
