//! Macro language: dictionary, invocation parsing and template expansion.
//!
//! A message whose first whitespace-delimited word names a registered macro is
//! replaced by that macro's template, with the remaining words substituted as
//! arguments.
//!
//! ## Placeholders
//!
//! | Placeholder | Replaced with |
//! |-------------|---------------|
//! | `{{1}}`, `{{2}}`, ... | The n-th argument (1-indexed) |
//! | `{{*}}` / `{{arg}}` | All arguments joined by a single space |
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`MacroDictionary`] | Name to template mapping, consumed as a snapshot |
//! | [`MacroInvocation`] | Parsed `<name> <arg1> <arg2> ...` input |
//! | [`expand`] | Pure expansion function |
//! | [`validator`] | Save-time dictionary checks |
//! | [`store`] | Dictionary persistence backends |

mod dictionary;
mod expand;
pub mod store;
pub mod validator;

pub use dictionary::{MacroDictionary, EXAMPLE_JSON};
pub use expand::{expand, expand_detailed, ExpansionOutcome, MacroInvocation, UnchangedReason};
pub use store::{DictionaryStore, FileStore, MemoryStore, NullStore};
pub use validator::{is_valid_macro_name, validate_str, validate_value};
