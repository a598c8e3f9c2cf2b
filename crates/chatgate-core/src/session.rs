//! Session-to-trace mapping.
//!
//! Associates a caller-declared session id with exactly one trace id issued
//! by the external observability collector. The store is injected through
//! `AppState` rather than living in a process global, so the concurrency
//! contract is explicit and testable.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use chatgate_types::error::TraceError;

/// Trait for the external observability collector.
///
/// Both calls are opaque and never retried. Implementations live in
/// chatgate-infra.
pub trait TraceCollector: Send + Sync {
    /// Obtain a fresh trace id from the collector.
    fn create_trace_id(&self) -> impl Future<Output = Result<String, TraceError>> + Send;

    /// Fetch a named prompt from the collector's prompt registry.
    fn get_prompt(&self, name: &str) -> impl Future<Output = Result<String, TraceError>> + Send;
}

impl<C: TraceCollector> TraceCollector for Arc<C> {
    async fn create_trace_id(&self) -> Result<String, TraceError> {
        (**self).create_trace_id().await
    }

    async fn get_prompt(&self, name: &str) -> Result<String, TraceError> {
        (**self).get_prompt(name).await
    }
}

/// Concurrency-safe mapping from session id to trace id.
///
/// Entries are created on first use per session and removed only by
/// [`reset`](Self::reset); the map grows without bound across the process
/// lifetime and is lost on restart.
pub struct SessionTraceStore<C> {
    collector: C,
    traces: DashMap<String, String>,
}

impl<C: TraceCollector> SessionTraceStore<C> {
    pub fn new(collector: C) -> Self {
        Self {
            collector,
            traces: DashMap::new(),
        }
    }

    /// Return the trace id for `session_id`, asking the collector for a new
    /// one on first use.
    ///
    /// Two requests racing on first creation may both call the collector,
    /// but the entry API stores a single winner and every caller observes
    /// that same id.
    pub async fn get_or_create(&self, session_id: &str) -> Result<String, TraceError> {
        if let Some(trace_id) = self.traces.get(session_id) {
            return Ok(trace_id.clone());
        }

        let fresh = self.collector.create_trace_id().await?;
        let trace_id = self
            .traces
            .entry(session_id.to_string())
            .or_insert(fresh)
            .clone();
        debug!(session_id, trace_id = %trace_id, "session trace mapped");
        Ok(trace_id)
    }

    /// Remove the mapping for `session_id`. Absent ids are not an error.
    pub fn reset(&self, session_id: &str) {
        if self.traces.remove(session_id).is_some() {
            debug!(session_id, "session trace reset");
        }
    }

    /// Number of live session mappings.
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }
}
