//! Rewrite observation sinks.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// A successful rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteEvent {
    pub url: String,
    pub macro_name: String,
    pub from: String,
    pub to: String,
}

/// Destination for rewrite observations. Fire-and-forget: implementations must not
/// block and have no way to fail the request.
pub trait RewriteSink: Send + Sync {
    fn record(&self, event: &RewriteEvent);
}

/// Default sink: structured `tracing` event.
pub struct TracingRewriteSink;

impl RewriteSink for TracingRewriteSink {
    fn record(&self, event: &RewriteEvent) {
        tracing::info!(
            url = %event.url,
            macro_name = %event.macro_name,
            from = %event.from,
            to = %event.to,
            "macro rewritten"
        );
    }
}

pub struct NoopRewriteSink;

impl RewriteSink for NoopRewriteSink {
    fn record(&self, _event: &RewriteEvent) {}
}

/// In-memory sink for testing.
pub struct InMemoryRewriteSink {
    events: RwLock<Vec<RewriteEvent>>,
    max_events: usize,
}

impl InMemoryRewriteSink {
    pub fn new(max: usize) -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            max_events: max,
        }
    }
    pub fn events(&self) -> Vec<RewriteEvent> {
        self.events.read().map(|e| e.clone()).unwrap_or_default()
    }
    pub fn len(&self) -> usize {
        self.events.read().map(|e| e.len()).unwrap_or(0)
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryRewriteSink {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl RewriteSink for InMemoryRewriteSink {
    fn record(&self, event: &RewriteEvent) {
        // A poisoned lock drops the observation.
        if let Ok(mut events) = self.events.write() {
            events.push(event.clone());
            if events.len() > self.max_events {
                events.remove(0);
            }
        }
    }
}

impl<S: RewriteSink + ?Sized> RewriteSink for Arc<S> {
    fn record(&self, event: &RewriteEvent) {
        (**self).record(event)
    }
}
