//! Outbound request model and the send primitive.
//!
//! [`Transport`] is the seam the rewrite interceptor wraps: anything that can send
//! an [`OutboundRequest`] and hand back a pending response.

mod http;
mod request;

pub use http::{HttpTransport, TransportError};
pub use request::{OutboundRequest, RequestBody};

use crate::Result;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// The request-sending entry point.
#[async_trait]
pub trait Transport: Send + Sync {
    type Response: Send + 'static;

    async fn send(&self, request: OutboundRequest) -> Result<Self::Response>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    type Response = T::Response;

    async fn send(&self, request: OutboundRequest) -> Result<Self::Response> {
        (**self).send(request).await
    }
}

/// Adapts an async closure into a [`Transport`].
pub struct FnTransport<F> {
    func: F,
}

impl<F> FnTransport<F> {
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F, Fut, R> Transport for FnTransport<F>
where
    F: Fn(OutboundRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R>> + Send + 'static,
    R: Send + 'static,
{
    type Response = R;

    async fn send(&self, request: OutboundRequest) -> Result<R> {
        (self.func)(request).await
    }
}
