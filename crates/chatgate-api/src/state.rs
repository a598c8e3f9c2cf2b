//! Application state wiring the infra implementations together.
//!
//! Handlers are written against the concrete types pinned here; the trait
//! seams live in chatgate-core so the session store and prompt resolution
//! stay testable with collector doubles.

use std::sync::Arc;

use chatgate_core::session::SessionTraceStore;
use chatgate_infra::config::RelayConfig;
use chatgate_infra::llm::ChatCompletionsProvider;
use chatgate_infra::trace::HttpTraceCollector;

/// Session store pinned to the HTTP collector implementation.
pub type ConcreteSessionStore = SessionTraceStore<Arc<HttpTraceCollector>>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<ChatCompletionsProvider>,
    pub collector: Arc<HttpTraceCollector>,
    pub sessions: Arc<ConcreteSessionStore>,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    /// Build the state from a loaded configuration.
    pub fn init(config: RelayConfig) -> Self {
        let provider = Arc::new(ChatCompletionsProvider::new(
            config.provider_api_key.clone(),
            config.provider_base_url.clone(),
            config.read_timeout,
        ));
        let collector = Arc::new(HttpTraceCollector::new(
            config.collector_host.clone(),
            config.collector_public_key.clone(),
            config.collector_secret_key.clone(),
        ));
        let sessions = Arc::new(SessionTraceStore::new(collector.clone()));

        Self {
            provider,
            collector,
            sessions,
            config: Arc::new(config),
        }
    }
}
