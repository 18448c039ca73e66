//! Error types with fix suggestions
//!
//! Lexing/parsing failures are the only hard errors this crate raises;
//! evaluation-time problems (unknown names, unready tokens, multi-value
//! results) are diagnostics, not errors, and live in
//! [`crate::diagnostics::Diagnostics`].

use thiserror::Error;

use crate::lexer::BitKind;

/// Trait for errors that provide fix suggestions.
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Top-level crate error.
#[derive(Error, Debug)]
pub enum WeftError {
    /// A field failed to parse. Carries the raw field text so the caller can
    /// report which field was malformed, with the underlying lexical error
    /// as the source.
    #[error("WEFT-010: failed parsing token string \"{raw}\"")]
    Parse {
        raw: String,
        #[source]
        source: LexError,
    },
}

/// Fine-grained lexical format errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("WEFT-011: expected {expected}, found {found} \"{text}\"")]
    UnexpectedBit {
        expected: BitKind,
        found: BitKind,
        text: String,
    },

    #[error("WEFT-012: reached end of input, expected {expected}")]
    UnexpectedEnd { expected: BitKind },

    #[error("WEFT-013: token name is empty")]
    EmptyName,

    #[error("WEFT-014: unexpected text after the token: \"{text}\"")]
    TrailingInput { text: String },
}

impl FixSuggestion for WeftError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            WeftError::Parse { source, .. } => source.fix_suggestion(),
        }
    }
}

impl FixSuggestion for LexError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            LexError::UnexpectedBit { .. } | LexError::UnexpectedEnd { .. } => {
                Some("Check token syntax: {{name}} or {{name: input}}")
            }
            LexError::EmptyName => Some("Add a token name between the {{ }} braces"),
            LexError::TrailingInput { .. } => {
                Some("A single-token field cannot contain text after the token")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_raw_text_and_cause() {
        let error = WeftError::Parse {
            raw: "{{broken".to_string(),
            source: LexError::UnexpectedEnd {
                expected: BitKind::EndPlaceholder,
            },
        };

        let message = error.to_string();
        assert!(message.contains("WEFT-010"));
        assert!(message.contains("{{broken"));

        let source = std::error::Error::source(&error).unwrap();
        assert!(source.to_string().contains("WEFT-012"));
        assert!(source.to_string().contains("'}}'"));
    }

    #[test]
    fn unexpected_bit_names_both_kinds() {
        let error = LexError::UnexpectedBit {
            expected: BitKind::Literal,
            found: BitKind::PositionalArgSeparator,
            text: ":".to_string(),
        };

        let message = error.to_string();
        assert!(message.contains("literal text"));
        assert!(message.contains("':'"));
    }

    #[test]
    fn fix_suggestions_exist_for_all_lex_errors() {
        let errors = [
            LexError::UnexpectedBit {
                expected: BitKind::Literal,
                found: BitKind::EndPlaceholder,
                text: "}}".to_string(),
            },
            LexError::UnexpectedEnd {
                expected: BitKind::EndPlaceholder,
            },
            LexError::EmptyName,
            LexError::TrailingInput {
                text: "tail".to_string(),
            },
        ];

        for error in errors {
            assert!(error.fix_suggestion().is_some());
        }
    }
}
