//! ArgumentList: parsed view over a placeholder's resolved input text
//!
//! By the time arguments reach a context they are plain text (nested
//! placeholders were already substituted). The text is `positional parts |
//! named parts`: everything before the first `|` splits on commas, every
//! later `|part` is a `key=value` pair (value optional). `|` is never
//! nesting-aware, matching the lexer.
//!
//! Single pass, no regex; named keys share the token-name rules, so they
//! compare case-insensitively.

use std::collections::HashMap;

use crate::split::split_values;
use crate::token_name::TokenName;

/// Parsed input arguments for a context lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentList {
    raw: String,
    positional: Vec<String>,
    named: HashMap<TokenName, String>,
}

impl ArgumentList {
    /// Parse a resolved argument string.
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split('|');
        let positional = split_values(parts.next().unwrap_or(""));

        let mut named = HashMap::new();
        for part in parts {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (key, value) = match part.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (part, ""),
            };
            if key.is_empty() {
                continue;
            }
            named.insert(TokenName::from(key), value.to_string());
        }

        Self {
            raw: raw.to_string(),
            positional,
            named,
        }
    }

    /// The unparsed argument text, for contexts that want it verbatim.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Positional arguments, trimmed, empties dropped.
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// The first positional argument, if any.
    pub fn first(&self) -> Option<&str> {
        self.positional.first().map(String::as_str)
    }

    /// Look up a named argument (case-insensitive key).
    pub fn named(&self, key: &str) -> Option<&str> {
        self.named.get(&TokenName::from(key)).map(String::as_str)
    }

    /// Whether a named argument is present, even with an empty value.
    pub fn has_named(&self, key: &str) -> bool {
        self.named.contains_key(&TokenName::from(key))
    }

    /// True when there are no positional and no named arguments.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}
