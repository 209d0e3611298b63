//! Runtime configuration, sourced from the environment.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `PROMPT_REWRITER_MACROS` | Path of the JSON macro dictionary |
//! | `PROMPT_REWRITER_ENDPOINT_SEGMENT` | URL segment of the submission endpoint |
//! | `PROMPT_REWRITER_BODY_MARKER` | Body substring marking a messages payload |
//! | `PROMPT_REWRITER_HTTP_TIMEOUT_SECS` | HTTP timeout of [`crate::transport::HttpTransport`] |
//! | `PROMPT_REWRITER_PROXY_URL` | Outbound proxy of [`crate::transport::HttpTransport`] |

use crate::interceptors::{
    install, RewriteInterceptorBuilder, RewriteRules, RewriteSink, SharedTransport,
    TracingRewriteSink,
};
use crate::macros::{DictionaryStore, FileStore, NullStore};
use crate::transport::HttpTransport;
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;

pub const MACROS_PATH_ENV: &str = "PROMPT_REWRITER_MACROS";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriterConfig {
    pub rules: RewriteRules,
    pub macros_path: Option<PathBuf>,
}

impl RewriterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self {
            rules: RewriteRules::from_env(),
            macros_path: std::env::var_os(MACROS_PATH_ENV)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn with_rules(mut self, rules: RewriteRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_macros_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.macros_path = Some(path.into());
        self
    }

    /// File store when a path is configured, otherwise no macros at all.
    pub fn store(&self) -> Arc<dyn DictionaryStore> {
        match &self.macros_path {
            Some(path) => Arc::new(FileStore::new(path)),
            None => Arc::new(NullStore),
        }
    }

    /// Build the rewriting HTTP entry point and install it process-wide.
    pub fn install(&self) -> Result<SharedTransport> {
        self.install_with_sink(Arc::new(TracingRewriteSink))
    }

    pub fn install_with_sink(&self, sink: Arc<dyn RewriteSink>) -> Result<SharedTransport> {
        let interceptor = RewriteInterceptorBuilder::new()
            .store(self.store())
            .rules(self.rules.clone())
            .sink(sink)
            .build(HttpTransport::new()?);
        install(Arc::new(interceptor))
    }
}
