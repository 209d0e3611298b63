//! Macro dictionary.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Default editor content offered when nothing has been stored yet.
pub const EXAMPLE_JSON: &str = r#"{
  "aiu": "Update {{1}} in {{2}} and emit the full file.",
  "ex":  "Explain {{*}} step by step, including reasoning.",
  "gen": "Generate {{1}} using {{2}} with options: {{*}}"
}"#;

/// Mapping from macro name to template.
///
/// Entries are kept as raw JSON values: a dictionary loaded from storage is only
/// required to be an object, and a non-string entry simply never expands.
/// Dictionaries that went through [`crate::macros::validate_value`] hold strings only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacroDictionary {
    entries: BTreeMap<String, Value>,
}

impl MacroDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept any JSON object as a dictionary. Anything else is treated as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        Some(Self {
            entries: map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        })
    }

    /// Parse stored text. Malformed or non-object content is treated as absent.
    pub fn from_json_str(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        let value: Value = serde_json::from_str(raw).ok()?;
        Self::from_value(&value)
    }

    /// The dictionary shipped as [`EXAMPLE_JSON`].
    pub fn example() -> Self {
        Self::from_json_str(EXAMPLE_JSON).unwrap_or_default()
    }

    pub fn with(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(name, template);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.entries
            .insert(name.into(), Value::String(template.into()));
    }

    /// Template registered under `name`, if it is a string.
    pub fn template(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(Value::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MacroDictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}
