//! Diagnostic state accumulated during evaluation
//!
//! Evaluation never fails hard: unknown names, unready tokens, and
//! multi-value misuse accumulate here so one bad field never aborts its
//! siblings. Aggregates merge child states (set union for names, message
//! concatenation for errors).

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use crate::token_name::TokenName;

/// Invalid/unready token names and error messages from an evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Names that no context knows about at all.
    pub invalid_tokens: BTreeSet<TokenName>,
    /// Names that exist but can't currently be resolved.
    pub unready_tokens: BTreeSet<TokenName>,
    /// Error messages (e.g. a multi-value result where one value was needed).
    pub errors: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing was recorded.
    pub fn is_ok(&self) -> bool {
        self.invalid_tokens.is_empty() && self.unready_tokens.is_empty() && self.errors.is_empty()
    }

    pub fn add_invalid(&mut self, name: TokenName) {
        self.invalid_tokens.insert(name);
    }

    pub fn add_unready(&mut self, name: TokenName) {
        self.unready_tokens.insert(name);
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Merge another state into this one.
    pub fn merge(&mut self, other: &Diagnostics) {
        self.invalid_tokens
            .extend(other.invalid_tokens.iter().cloned());
        self.unready_tokens
            .extend(other.unready_tokens.iter().cloned());
        self.errors.extend(other.errors.iter().cloned());
    }

    pub fn clear(&mut self) {
        self.invalid_tokens.clear();
        self.unready_tokens.clear();
        self.errors.clear();
    }

    /// Serialize for event logging.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_state_is_ok() {
        assert!(Diagnostics::new().is_ok());
    }

    #[test]
    fn any_entry_makes_it_not_ok() {
        let mut state = Diagnostics::new();
        state.add_invalid(TokenName::new("ghost"));
        assert!(!state.is_ok());

        let mut state = Diagnostics::new();
        state.add_unready(TokenName::new("season"));
        assert!(!state.is_ok());

        let mut state = Diagnostics::new();
        state.add_error("boom");
        assert!(!state.is_ok());
    }

    #[test]
    fn merge_unions_names_and_concatenates_errors() {
        let mut left = Diagnostics::new();
        left.add_invalid(TokenName::new("a"));
        left.add_error("first");

        let mut right = Diagnostics::new();
        right.add_invalid(TokenName::new("a"));
        right.add_invalid(TokenName::new("b"));
        right.add_unready(TokenName::new("c"));
        right.add_error("second");

        left.merge(&right);
        assert_eq!(left.invalid_tokens.len(), 2);
        assert_eq!(left.unready_tokens.len(), 1);
        assert_eq!(left.errors, vec!["first", "second"]);
    }

    #[test]
    fn name_sets_dedup_case_variants() {
        let mut state = Diagnostics::new();
        state.add_unready(TokenName::new("Season"));
        state.add_unready(TokenName::new("season"));
        assert_eq!(state.unready_tokens.len(), 1);
    }

    #[test]
    fn serializes_for_event_logging() {
        let mut state = Diagnostics::new();
        state.add_invalid(TokenName::new("ghost"));
        state.add_error("multi-value");

        let value = state.to_value();
        assert_eq!(value["invalid_tokens"], serde_json::json!(["ghost"]));
        assert_eq!(value["errors"], serde_json::json!(["multi-value"]));
        assert_eq!(value["unready_tokens"], serde_json::json!([]));
    }

    #[test]
    fn clear_resets_everything() {
        let mut state = Diagnostics::new();
        state.add_invalid(TokenName::new("x"));
        state.add_error("err");
        state.clear();
        assert!(state.is_ok());
    }
}
