//! Process-wide interception point.
//!
//! The application installs its rewriting transport once at startup; every later
//! outbound call goes through [`installed`].

use crate::transport::Transport;
use crate::{Error, ErrorContext, Result};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Shared handle to the process-wide send primitive.
pub type SharedTransport = Arc<dyn Transport<Response = reqwest::Response>>;

static INSTALLED: OnceCell<SharedTransport> = OnceCell::new();

/// Install `transport` as the process-wide entry point. Only the first call wins.
pub fn install(transport: SharedTransport) -> Result<SharedTransport> {
    INSTALLED.set(transport).map_err(|_| {
        Error::configuration_with_context(
            "interceptor already installed",
            ErrorContext::new().with_source("global_transport"),
        )
    })?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "prompt rewriter installed");
    installed().ok_or_else(|| {
        Error::configuration_with_context(
            "interceptor not installed",
            ErrorContext::new().with_source("global_transport"),
        )
    })
}

/// The installed entry point, if any.
pub fn installed() -> Option<SharedTransport> {
    INSTALLED.get().cloned()
}
