//! Context contract and a ready-made map-backed implementation
//!
//! The context is the caller's side of the bargain: a read-only lookup from
//! token name (plus optional input arguments) to values. The evaluator only
//! ever reads from it.
//!
//! Most hosts implement [`TokenContext`] over their own state; [`MapContext`]
//! covers tests and simple embeddings.

use std::collections::{HashMap, HashSet};

use crate::args::ArgumentList;
use crate::token_name::TokenName;

/// Outcome of a context lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The name resolved to exactly one value.
    One(String),
    /// The name resolved to multiple values. Call sites that need a single
    /// value record a diagnostic error instead of substituting.
    Many(Vec<String>),
    /// The name exists but can't be resolved right now (e.g. world state not
    /// loaded yet). Expected to clear up on a later update.
    Unready,
    /// No such name in any context the host registers.
    Unknown,
}

/// Read-only lookup service supplied by the caller.
pub trait TokenContext {
    /// Resolve a token name with optional input arguments.
    fn resolve(&self, name: &TokenName, args: Option<&ArgumentList>) -> Resolution;
}

/// A `HashMap`-backed context for hosts and tests.
///
/// Names are case-insensitive (see [`TokenName`]). A name that was
/// registered and later [`removed`](MapContext::remove) stays known and
/// reports [`Resolution::Unready`]; use [`forget`](MapContext::forget) to
/// unregister it entirely.
#[derive(Debug, Clone, Default)]
pub struct MapContext {
    values: HashMap<TokenName, Vec<String>>,
    known: HashSet<TokenName>,
}

impl MapContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context from single-valued entries.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<TokenName>,
        V: Into<String>,
    {
        let mut context = Self::new();
        for (name, value) in values {
            context.set(name, value);
        }
        context
    }

    /// Set a single value for a name.
    pub fn set(&mut self, name: impl Into<TokenName>, value: impl Into<String>) {
        let name = name.into();
        self.known.insert(name.clone());
        self.values.insert(name, vec![value.into()]);
    }

    /// Set multiple values for a name.
    pub fn set_many<I, V>(&mut self, name: impl Into<TokenName>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        self.known.insert(name.clone());
        self.values
            .insert(name, values.into_iter().map(Into::into).collect());
    }

    /// Mark a name as known but currently unresolvable.
    pub fn set_unready(&mut self, name: impl Into<TokenName>) {
        let name = name.into();
        self.values.remove(&name);
        self.known.insert(name);
    }

    /// Remove a name's values. The name stays known and reports unready.
    pub fn remove(&mut self, name: impl Into<TokenName>) {
        self.values.remove(&name.into());
    }

    /// Unregister a name entirely so it reports unknown.
    pub fn forget(&mut self, name: impl Into<TokenName>) {
        let name = name.into();
        self.values.remove(&name);
        self.known.remove(&name);
    }
}

impl TokenContext for MapContext {
    fn resolve(&self, name: &TokenName, _args: Option<&ArgumentList>) -> Resolution {
        if let Some(values) = self.values.get(name) {
            return match values.as_slice() {
                [] => Resolution::Unready,
                [value] => Resolution::One(value.clone()),
                _ => Resolution::Many(values.clone()),
            };
        }
        if self.known.contains(name) {
            Resolution::Unready
        } else {
            Resolution::Unknown
        }
    }
}
