//! Dependency aggregation across contextual values
//!
//! A configuration record holds many token strings (and sometimes nested
//! records); the aggregate rolls a context update across all of them, ORs
//! their change flags, and merges their dependency and diagnostic state.
//!
//! Children are shared by reference: the same child can belong to several
//! aggregates, and lifetime is governed by whoever constructed it, not by
//! the aggregate. Sharing is single-threaded `Rc<RefCell>`; hosts that need
//! threads must serialize updates themselves.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::context::TokenContext;
use crate::diagnostics::Diagnostics;
use crate::token_name::TokenName;

/// A value whose state derives from a token context.
pub trait Contextual {
    /// Re-evaluate against the context; true when anything changed.
    fn update_context(&mut self, context: &dyn TokenContext) -> bool;

    /// Whether the value can change across context updates.
    fn is_mutable(&self) -> bool;

    /// Whether every referenced name currently resolves.
    fn is_ready(&self) -> bool;

    /// The token names this value depends on.
    fn tokens_used(&self) -> BTreeSet<TokenName>;

    /// Diagnostic state from the latest evaluation.
    fn diagnostic_state(&self) -> Diagnostics;
}

/// Non-owning handle to a shared contextual child.
pub type SharedContextual = Rc<RefCell<dyn Contextual>>;

/// A composition of contextual children.
///
/// Constructed empty; children are added at setup time and never removed.
#[derive(Default)]
pub struct AggregateContextual {
    children: Vec<SharedContextual>,
}

impl AggregateContextual {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child. Fluent, so setup code can chain adds.
    pub fn add(&mut self, child: SharedContextual) -> &mut Self {
        self.children.push(child);
        self
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Contextual for AggregateContextual {
    fn update_context(&mut self, context: &dyn TokenContext) -> bool {
        // Every child must refresh its own cached state, so no
        // short-circuiting after the first reported change.
        let mut changed = false;
        for child in &self.children {
            changed |= child.borrow_mut().update_context(context);
        }
        changed
    }

    fn is_mutable(&self) -> bool {
        self.children.iter().any(|child| child.borrow().is_mutable())
    }

    fn is_ready(&self) -> bool {
        self.children.iter().all(|child| child.borrow().is_ready())
    }

    fn tokens_used(&self) -> BTreeSet<TokenName> {
        let mut names = BTreeSet::new();
        for child in &self.children {
            names.extend(child.borrow().tokens_used());
        }
        names
    }

    fn diagnostic_state(&self) -> Diagnostics {
        let mut state = Diagnostics::new();
        for child in &self.children {
            state.merge(&child.borrow().diagnostic_state());
        }
        state
    }
}
