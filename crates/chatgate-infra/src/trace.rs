//! HttpTraceCollector -- concrete [`TraceCollector`] for a Langfuse-style
//! observability collector.
//!
//! Trace registration goes through the collector's batch ingestion endpoint;
//! prompts come from its prompt registry. Both calls authenticate with the
//! public/secret key pair over HTTP basic auth and are never retried.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use chatgate_core::session::TraceCollector;
use chatgate_types::error::TraceError;

/// HTTP client for the external observability collector.
///
/// Does NOT derive Debug to prevent accidental exposure of the secret key.
pub struct HttpTraceCollector {
    client: reqwest::Client,
    host: String,
    public_key: SecretString,
    secret_key: SecretString,
}

#[derive(Debug, Deserialize)]
struct PromptResponse {
    prompt: String,
}

impl HttpTraceCollector {
    pub fn new(host: String, public_key: SecretString, secret_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            host,
            public_key,
            secret_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.host.trim_end_matches('/'))
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(
            self.public_key.expose_secret(),
            Some(self.secret_key.expose_secret()),
        )
    }
}

impl TraceCollector for HttpTraceCollector {
    /// Register a fresh trace with the collector and return its id.
    async fn create_trace_id(&self) -> Result<String, TraceError> {
        let trace_id = Uuid::now_v7().to_string();
        let timestamp = chrono::Utc::now().to_rfc3339();
        let body = json!({
            "batch": [{
                "id": Uuid::now_v7().to_string(),
                "type": "trace-create",
                "timestamp": timestamp,
                "body": { "id": trace_id, "timestamp": timestamp },
            }],
        });

        let response = self
            .authed(self.client.post(self.url("/api/public/ingestion")))
            .json(&body)
            .send()
            .await
            .map_err(|e| TraceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TraceError::Status {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(trace_id)
    }

    /// Fetch a named prompt from the collector's prompt registry.
    async fn get_prompt(&self, name: &str) -> Result<String, TraceError> {
        let response = self
            .authed(self.client.get(self.url(&format!("/api/public/v2/prompts/{name}"))))
            .send()
            .await
            .map_err(|e| TraceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TraceError::Status {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let parsed: PromptResponse = response
            .json()
            .await
            .map_err(|e| TraceError::Deserialization(e.to_string()))?;
        Ok(parsed.prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{basic_auth, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn collector_for(server: &MockServer) -> HttpTraceCollector {
        HttpTraceCollector::new(
            server.uri(),
            SecretString::from("pk-test"),
            SecretString::from("sk-test"),
        )
    }

    #[tokio::test]
    async fn test_create_trace_id_registers_and_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/public/ingestion"))
            .and(basic_auth("pk-test", "sk-test"))
            .respond_with(ResponseTemplate::new(207).set_body_json(json!({
                "successes": [{"id": "ev", "status": 201}],
                "errors": [],
            })))
            .expect(2)
            .mount(&server)
            .await;

        let collector = collector_for(&server);
        let first = collector.create_trace_id().await.unwrap();
        let second = collector.create_trace_id().await.unwrap();
        assert!(!first.is_empty());
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_create_trace_id_surfaces_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/public/ingestion"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad keys"))
            .mount(&server)
            .await;

        let collector = collector_for(&server);
        let result = collector.create_trace_id().await;
        assert!(matches!(result, Err(TraceError::Status { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_get_prompt_returns_registry_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/v2/prompts/chat-system"))
            .and(basic_auth("pk-test", "sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "chat-system",
                "version": 3,
                "prompt": "Answer briefly.",
            })))
            .mount(&server)
            .await;

        let collector = collector_for(&server);
        let prompt = collector.get_prompt("chat-system").await.unwrap();
        assert_eq!(prompt, "Answer briefly.");
    }

    #[tokio::test]
    async fn test_get_prompt_maps_missing_to_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/v2/prompts/chat-system"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let collector = collector_for(&server);
        let result = collector.get_prompt("chat-system").await;
        assert!(matches!(result, Err(TraceError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_get_prompt_rejects_unexpected_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/v2/prompts/chat-system"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "prompt": [{"role": "system", "content": "chat-style prompt"}],
            })))
            .mount(&server)
            .await;

        let collector = collector_for(&server);
        let result = collector.get_prompt("chat-system").await;
        assert!(matches!(result, Err(TraceError::Deserialization(_))));
    }
}
