//! Weft - token expression lexer and context-driven template evaluation
//!
//! Parses configuration text containing `{{placeholder}}` expressions into
//! token trees, then incrementally re-evaluates them against a
//! caller-supplied context: which names a string depends on, whether it is
//! currently resolvable, and whether it can ever change.

pub mod aggregate;
pub mod args;
pub mod cache;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod split;
pub mod template;
pub mod token_name;

pub use aggregate::{AggregateContextual, Contextual, SharedContextual};
pub use args::ArgumentList;
pub use cache::{parse_cached, ParseCache};
pub use context::{MapContext, Resolution, TokenContext};
pub use diagnostics::Diagnostics;
pub use error::{FixSuggestion, LexError, WeftError};
pub use split::{split_values, split_values_with, SplitOptions};
pub use template::{parse_template, TokenString};
pub use token_name::TokenName;
