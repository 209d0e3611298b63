//! # prompt-rewriter
//!
//! Submit-time prompt rewriting for chat clients.
//!
//! A short token typed as the first word of a chat message (e.g. `ex`) expands into a
//! longer templated prompt, with the remaining words substituted as positional
//! arguments. The expansion happens in an interceptor wrapped around the outbound
//! request primitive, right before a new chat submission leaves the process.
//!
//! ## Core Behavior
//!
//! - **Transparent**: non-matching or malformed requests are forwarded untouched
//! - **Fail-safe**: a rewrite-path defect never blocks a message from being sent
//! - **Fresh**: the macro dictionary is loaded again for every candidate request
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prompt_rewriter::transport::{HttpTransport, OutboundRequest, Transport};
//! use prompt_rewriter::{FileStore, RewriteInterceptor};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> prompt_rewriter::Result<()> {
//!     let interceptor = RewriteInterceptor::new(
//!         HttpTransport::new()?,
//!         Arc::new(FileStore::new("macros.json")),
//!     );
//!
//!     let body = r#"{"messages":[{"content":{"parts":["ex ownership"]}}]}"#;
//!     let resp = interceptor
//!         .send(OutboundRequest::post("https://chatgpt.com/backend-api/conversation").with_body(body))
//!         .await?;
//!     println!("{}", resp.status());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`macros`] | Macro dictionary, expansion, validation and storage |
//! | [`interceptors`] | Request classification and the rewriting decorator |
//! | [`transport`] | Outbound request model and HTTP send primitive |
//! | [`config`] | Environment-driven configuration |

pub mod config;
pub mod interceptors;
pub mod macros;
pub mod transport;

pub use config::RewriterConfig;
pub use interceptors::{RewriteEvent, RewriteInterceptor, RewriteRules, RewriteSink};
pub use macros::{expand, DictionaryStore, FileStore, MacroDictionary, MemoryStore};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
