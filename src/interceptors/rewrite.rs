//! Rewrite stages.
//!
//! Each stage returns `Err(SkipReason)` instead of failing; [`rewrite_request`]
//! reduces any skip to pass-through and only touches the request on success.

use super::RewriteEvent;
use crate::macros::{expand_detailed, ExpansionOutcome, MacroDictionary};
use crate::transport::OutboundRequest;
use serde_json::Value;
use std::env;

pub const DEFAULT_ENDPOINT_SEGMENT: &str = "/backend-api/conversation";
pub const DEFAULT_BODY_MARKER: &str = "\"messages\"";

/// Classification rule for candidate requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRules {
    /// Path segment identifying the conversation-submission endpoint.
    pub endpoint_segment: String,
    /// Literal substring marking a messages payload.
    pub body_marker: String,
}

impl RewriteRules {
    pub fn new(endpoint_segment: impl Into<String>, body_marker: impl Into<String>) -> Self {
        Self {
            endpoint_segment: endpoint_segment.into(),
            body_marker: body_marker.into(),
        }
    }

    /// Defaults, overridable via `PROMPT_REWRITER_ENDPOINT_SEGMENT` and
    /// `PROMPT_REWRITER_BODY_MARKER`.
    pub fn from_env() -> Self {
        let non_empty = |key: &str| env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            endpoint_segment: non_empty("PROMPT_REWRITER_ENDPOINT_SEGMENT")
                .unwrap_or_else(|| DEFAULT_ENDPOINT_SEGMENT.to_string()),
            body_marker: non_empty("PROMPT_REWRITER_BODY_MARKER")
                .unwrap_or_else(|| DEFAULT_BODY_MARKER.to_string()),
        }
    }
}

impl Default for RewriteRules {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT_SEGMENT, DEFAULT_BODY_MARKER)
    }
}

/// Why a request was forwarded untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotCandidate,
    NonTextBody,
    MalformedBody(String),
    UnexpectedShape,
    NoRewrite,
    EncodeFailed(String),
}

/// Endpoint match OR textual body containing the marker.
pub fn is_candidate(request: &OutboundRequest, rules: &RewriteRules) -> bool {
    request.url.contains(&rules.endpoint_segment)
        || request
            .text_body()
            .is_some_and(|body| body.contains(&rules.body_marker))
}

pub fn parse_body(body: &str) -> Result<Value, SkipReason> {
    serde_json::from_str(body).map_err(|e| SkipReason::MalformedBody(e.to_string()))
}

/// `messages[0].content.parts[0]`, both lists required to be arrays.
fn prompt_slot(payload: &mut Value) -> Option<&mut Value> {
    payload
        .get_mut("messages")?
        .as_array_mut()?
        .first_mut()?
        .get_mut("content")?
        .get_mut("parts")?
        .as_array_mut()?
        .first_mut()
}

pub fn extract_text(payload: &mut Value) -> Result<String, SkipReason> {
    prompt_slot(payload)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or(SkipReason::UnexpectedShape)
}

/// Expand `text`; a result equal to the input counts as no rewrite.
pub fn rewrite_text(
    text: &str,
    dictionary: Option<&MacroDictionary>,
) -> Result<(String, String), SkipReason> {
    match expand_detailed(text, dictionary) {
        ExpansionOutcome::Rewritten { macro_name, text: rewritten } if rewritten != text => {
            Ok((macro_name, rewritten))
        }
        _ => Err(SkipReason::NoRewrite),
    }
}

/// Put `text` back into the payload and re-serialize it.
pub fn encode_body(payload: &mut Value, text: String) -> Result<String, SkipReason> {
    let slot = prompt_slot(payload).ok_or(SkipReason::UnexpectedShape)?;
    *slot = Value::String(text);
    serde_json::to_string(payload).map_err(|e| SkipReason::EncodeFailed(e.to_string()))
}

/// Run all stages against `request`, loading the dictionary only once a prompt
/// has been found. On `Err` the request has not been modified.
pub fn rewrite_request<F>(
    request: &mut OutboundRequest,
    rules: &RewriteRules,
    load_dictionary: F,
) -> Result<RewriteEvent, SkipReason>
where
    F: FnOnce() -> Option<MacroDictionary>,
{
    if !is_candidate(request, rules) {
        return Err(SkipReason::NotCandidate);
    }
    let body = request.text_body().ok_or(SkipReason::NonTextBody)?;

    let mut payload = parse_body(body)?;
    let original = extract_text(&mut payload)?;
    let dictionary = load_dictionary();
    let (macro_name, rewritten) = rewrite_text(&original, dictionary.as_ref())?;
    let encoded = encode_body(&mut payload, rewritten.clone())?;

    request.replace_text_body(encoded);
    Ok(RewriteEvent {
        url: request.url.clone(),
        macro_name,
        from: original,
        to: rewritten,
    })
}
