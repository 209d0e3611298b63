//! Submit-time rewrite interceptor.
//!
//! [`RewriteInterceptor`] decorates a [`Transport`]: it inspects every outbound
//! request, expands a macro in the first user message of candidate requests and
//! forwards the call to `next`. Anything that does not match, or fails on the way,
//! is forwarded exactly as received. The interceptor never fails a request itself;
//! errors seen by the caller come from `next`.

mod global;
mod rewrite;
mod sink;

pub use global::{install, installed, SharedTransport};
pub use rewrite::{
    encode_body, extract_text, is_candidate, parse_body, rewrite_request, rewrite_text,
    RewriteRules, SkipReason, DEFAULT_BODY_MARKER, DEFAULT_ENDPOINT_SEGMENT,
};
pub use sink::{
    InMemoryRewriteSink, NoopRewriteSink, RewriteEvent, RewriteSink, TracingRewriteSink,
};

use crate::macros::{DictionaryStore, NullStore};
use crate::transport::{OutboundRequest, Transport};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Rewriting decorator around the send primitive `next`.
pub struct RewriteInterceptor<T> {
    next: T,
    store: Arc<dyn DictionaryStore>,
    rules: RewriteRules,
    sink: Arc<dyn RewriteSink>,
}

impl<T: Transport> RewriteInterceptor<T> {
    pub fn new(next: T, store: Arc<dyn DictionaryStore>) -> Self {
        RewriteInterceptorBuilder::new().store(store).build(next)
    }

    pub fn rules(&self) -> &RewriteRules {
        &self.rules
    }

    /// Rewrite `request` in place if it carries a macro invocation.
    pub fn prepare(&self, request: &mut OutboundRequest) {
        match rewrite_request(request, &self.rules, || self.store.load()) {
            Ok(event) => self.sink.record(&event),
            Err(SkipReason::NotCandidate) => {}
            Err(reason) => debug!(url = %request.url, ?reason, "request forwarded unchanged"),
        }
    }
}

#[async_trait]
impl<T: Transport> Transport for RewriteInterceptor<T> {
    type Response = T::Response;

    async fn send(&self, mut request: OutboundRequest) -> Result<Self::Response> {
        self.prepare(&mut request);
        self.next.send(request).await
    }
}

/// Builder for [`RewriteInterceptor`]. Defaults: no dictionary store, default rules,
/// tracing sink.
pub struct RewriteInterceptorBuilder {
    store: Arc<dyn DictionaryStore>,
    rules: RewriteRules,
    sink: Arc<dyn RewriteSink>,
}

impl RewriteInterceptorBuilder {
    pub fn new() -> Self {
        Self {
            store: Arc::new(NullStore),
            rules: RewriteRules::default(),
            sink: Arc::new(TracingRewriteSink),
        }
    }

    pub fn store(mut self, store: Arc<dyn DictionaryStore>) -> Self {
        self.store = store;
        self
    }

    pub fn rules(mut self, rules: RewriteRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn sink(mut self, sink: Arc<dyn RewriteSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn build<T: Transport>(self, next: T) -> RewriteInterceptor<T> {
        RewriteInterceptor {
            next,
            store: self.store,
            rules: self.rules,
            sink: self.sink,
        }
    }
}

impl Default for RewriteInterceptorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
