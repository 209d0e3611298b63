//! Template expansion.

use super::MacroDictionary;
use std::borrow::Cow;

/// Placeholders standing for all arguments joined by a single space.
const WILDCARD_PLACEHOLDERS: &[&str] = &["{{*}}", "{{arg}}"];

/// Token separator: Unicode whitespace plus the byte order mark, which browser
/// input treats as a space.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// A parsed `<name> <arg1> <arg2> ...` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroInvocation<'a> {
    pub name: &'a str,
    pub args: Vec<&'a str>,
}

impl<'a> MacroInvocation<'a> {
    /// Split on runs of whitespace. Returns `None` when there are no tokens.
    pub fn parse(text: &'a str) -> Option<Self> {
        let mut tokens = text.split(is_separator).filter(|t| !t.is_empty());
        let name = tokens.next()?;
        Some(Self {
            name,
            args: tokens.collect(),
        })
    }

    /// Wildcard value: arguments joined by a single space, empty without arguments.
    pub fn joined_args(&self) -> String {
        self.args.join(" ")
    }

    /// Substitute this invocation's arguments into `template`.
    ///
    /// Positional placeholders are replaced first in ascending order, then the
    /// wildcard spellings. Placeholders past the supplied argument count stay literal.
    pub fn apply(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (idx, arg) in self.args.iter().enumerate() {
            let placeholder = format!("{{{{{}}}}}", idx + 1);
            if result.contains(&placeholder) {
                result = result.replace(&placeholder, arg);
            }
        }

        let all_args = self.joined_args();
        for placeholder in WILDCARD_PLACEHOLDERS {
            if result.contains(placeholder) {
                result = result.replace(placeholder, &all_args);
            }
        }
        result
    }
}

/// Why an expansion left the text alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnchangedReason {
    NoDictionary,
    Empty,
    UnknownMacro(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionOutcome {
    Unchanged(UnchangedReason),
    Rewritten { macro_name: String, text: String },
}

/// Expand `text` against `dictionary`, reporting what happened.
pub fn expand_detailed(text: &str, dictionary: Option<&MacroDictionary>) -> ExpansionOutcome {
    let Some(dictionary) = dictionary else {
        return ExpansionOutcome::Unchanged(UnchangedReason::NoDictionary);
    };
    let Some(invocation) = MacroInvocation::parse(text.trim_matches(is_separator)) else {
        return ExpansionOutcome::Unchanged(UnchangedReason::Empty);
    };
    let Some(template) = dictionary.template(invocation.name) else {
        return ExpansionOutcome::Unchanged(UnchangedReason::UnknownMacro(
            invocation.name.to_string(),
        ));
    };

    ExpansionOutcome::Rewritten {
        macro_name: invocation.name.to_string(),
        text: invocation.apply(template),
    }
}

/// Expand `text` against `dictionary`.
///
/// Every no-op path hands back the untouched original (not a trimmed copy).
pub fn expand<'a>(text: &'a str, dictionary: Option<&MacroDictionary>) -> Cow<'a, str> {
    match expand_detailed(text, dictionary) {
        ExpansionOutcome::Rewritten { text, .. } => Cow::Owned(text),
        ExpansionOutcome::Unchanged(_) => Cow::Borrowed(text),
    }
}
