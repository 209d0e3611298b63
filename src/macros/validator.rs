//! Save-time dictionary validation.
//!
//! A save is all-or-nothing: the first violation rejects the whole dictionary.

use super::MacroDictionary;
use crate::{Error, ErrorContext, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Lowercase letter followed by 1-3 lowercase alphanumerics.
pub const MACRO_NAME_PATTERN: &str = "^[a-z][a-z0-9]{1,3}$";

static MACRO_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(MACRO_NAME_PATTERN).unwrap_or_else(|e| panic!("invalid macro name pattern: {e}"))
});

pub fn is_valid_macro_name(name: &str) -> bool {
    MACRO_NAME_RE.is_match(name)
}

fn violation(msg: String, field_path: String) -> Error {
    Error::validation_with_context(
        msg,
        ErrorContext::new()
            .with_field_path(field_path)
            .with_source("dictionary_validator"),
    )
}

/// Check a parsed dictionary candidate. Entries are checked in document order.
pub fn validate_value(value: &Value) -> Result<MacroDictionary> {
    let map = value.as_object().ok_or_else(|| {
        violation("Root must be an object".to_string(), "macros".to_string())
    })?;

    for (name, template) in map {
        if !is_valid_macro_name(name) {
            return Err(violation(
                format!("Invalid macro name: {}", name),
                format!("macros.{}", name),
            ));
        }
        if !template.is_string() {
            return Err(violation(
                format!("Macro value for \"{}\" must be a string", name),
                format!("macros.{}", name),
            ));
        }
    }

    Ok(map
        .iter()
        .filter_map(|(name, template)| template.as_str().map(|t| (name.as_str(), t)))
        .collect())
}

/// Parse and check editor text.
pub fn validate_str(raw: &str) -> Result<MacroDictionary> {
    let value: Value = serde_json::from_str(raw)?;
    validate_value(&value)
}
