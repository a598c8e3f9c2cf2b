//! Environment configuration, read once at startup.
//!
//! Every knob comes from the process environment (a `.env` file is loaded
//! by the binary before this runs). A missing required key is fatal at
//! startup; nothing re-reads the environment after boot.

use std::time::Duration;

use anyhow::{Context, Result};
use secrecy::SecretString;

const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_COLLECTOR_HOST: &str = "https://cloud.langfuse.com";
const DEFAULT_PROMPT_NAME: &str = "chat-system";
const DEFAULT_READ_TIMEOUT_SECS: u64 = 300;

/// Runtime configuration for the relay.
///
/// Three of the fields are credentials; `secrecy::SecretString` redacts
/// them in its `Debug` output, so deriving `Debug` does not leak secrets.
#[derive(Clone, Debug)]
pub struct RelayConfig {
    /// Bearer key for the chat-completions provider.
    pub provider_api_key: SecretString,
    pub provider_base_url: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    /// Public/secret key pair for the observability collector.
    pub collector_public_key: SecretString,
    pub collector_secret_key: SecretString,
    pub collector_host: String,
    /// Name of the system prompt in the collector's registry.
    pub prompt_name: String,
    /// Static access key; when unset the access check is disabled.
    pub access_key: Option<SecretString>,
    /// Per-chunk read timeout on the provider stream.
    pub read_timeout: Duration,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary lookup. Split out from
    /// [`from_env`](Self::from_env) so tests don't mutate process state.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            get(key)
                .filter(|value| !value.is_empty())
                .with_context(|| format!("{key} must be set"))
        };
        let optional = |key: &str| get(key).filter(|value| !value.is_empty());

        let max_tokens = optional("CHATGATE_MAX_TOKENS")
            .map(|value| value.parse::<u32>())
            .transpose()
            .context("CHATGATE_MAX_TOKENS must be a positive integer")?;

        let read_timeout_secs = optional("CHATGATE_READ_TIMEOUT_SECS")
            .map(|value| value.parse::<u64>())
            .transpose()
            .context("CHATGATE_READ_TIMEOUT_SECS must be a positive integer")?
            .unwrap_or(DEFAULT_READ_TIMEOUT_SECS);

        Ok(Self {
            provider_api_key: SecretString::from(required("CHATGATE_PROVIDER_API_KEY")?),
            provider_base_url: optional("CHATGATE_PROVIDER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PROVIDER_BASE_URL.to_string()),
            model: optional("CHATGATE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens,
            collector_public_key: SecretString::from(required("CHATGATE_COLLECTOR_PUBLIC_KEY")?),
            collector_secret_key: SecretString::from(required("CHATGATE_COLLECTOR_SECRET_KEY")?),
            collector_host: optional("CHATGATE_COLLECTOR_HOST")
                .unwrap_or_else(|| DEFAULT_COLLECTOR_HOST.to_string()),
            prompt_name: optional("CHATGATE_PROMPT_NAME")
                .unwrap_or_else(|| DEFAULT_PROMPT_NAME.to_string()),
            access_key: optional("CHATGATE_ACCESS_KEY").map(SecretString::from),
            read_timeout: Duration::from_secs(read_timeout_secs),
        })
    }
}
