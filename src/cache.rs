//! Shared parse cache
//!
//! Configuration records repeat the same raw strings many times (every patch
//! with a `{{season}}` condition, say), so token trees are parsed once per
//! unique raw string and shared via `Arc`. Uses DashMap for lock-free
//! concurrent access. Only successful parses are cached; a malformed string
//! re-reports its error on every attempt.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::error::WeftError;
use crate::parser::{parse_str, LexToken};

/// Global parse cache instance.
pub static PARSE_CACHE: Lazy<ParseCache> = Lazy::new(ParseCache::new);

/// Cache of parsed token trees keyed by raw string.
///
/// Trees are parsed in document mode with trimming, the mode
/// [`crate::template::TokenString`] uses.
pub struct ParseCache {
    cache: DashMap<String, Arc<Vec<LexToken>>>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    /// Parse a raw string, reusing the cached tree when one exists.
    pub fn parse(&self, raw: &str) -> Result<Arc<Vec<LexToken>>, WeftError> {
        if let Some(cached) = self.cache.get(raw) {
            return Ok(Arc::clone(&cached));
        }

        let tokens = Arc::new(parse_str(raw, false, true)?);
        self.cache.insert(raw.to_string(), Arc::clone(&tokens));
        Ok(tokens)
    }

    /// Number of cached trees.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse through the global cache.
pub fn parse_cached(raw: &str) -> Result<Arc<Vec<LexToken>>, WeftError> {
    PARSE_CACHE.parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_parses_share_the_same_tree() {
        let cache = ParseCache::new();
        let first = cache.parse("{{season}} crops").unwrap();
        let second = cache.parse("{{season}} crops").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_strings_get_distinct_trees() {
        let cache = ParseCache::new();
        let a = cache.parse("{{A}}").unwrap();
        let b = cache.parse("{{B}}").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failed_parses_are_not_cached() {
        let cache = ParseCache::new();
        assert!(cache.parse("{{broken").is_err());
        assert!(cache.is_empty());
        // and the error is reported again
        assert!(cache.parse("{{broken").is_err());
    }
}
