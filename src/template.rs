//! TokenString: a parsed template with incremental re-evaluation
//!
//! A raw string is parsed once at load time; after that its derived state
//! (substituted value, readiness, diagnostics) is recomputed in place on
//! every `update_context`, never re-parsed from text. `update_context`
//! reports whether the new pass differs from the cached one.
//!
//! Evaluation is synchronous and single-threaded; a host embedding templates
//! in a threaded environment must serialize `update_context` and accessor
//! calls per template.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::aggregate::Contextual;
use crate::args::ArgumentList;
use crate::cache::parse_cached;
use crate::context::{Resolution, TokenContext};
use crate::diagnostics::Diagnostics;
use crate::error::WeftError;
use crate::parser::{collect_token_names, contains_placeholder, LexToken};
use crate::token_name::TokenName;

/// A parsed template over a fixed raw string.
pub struct TokenString {
    /// The raw input, kept for error reporting and logging.
    raw: String,
    /// Parsed token tree, shared with other templates of the same raw text.
    tokens: Arc<Vec<LexToken>>,
    /// Substituted value from the latest evaluation pass.
    value: String,
    /// Every placeholder name reachable in the tree, nested args included.
    tokens_used: BTreeSet<TokenName>,
    /// Whether the tree contains at least one placeholder.
    is_mutable: bool,
    /// Whether every referenced name resolved in the latest pass.
    is_ready: bool,
    /// Diagnostic state from the latest pass.
    diagnostics: Diagnostics,
}

impl TokenString {
    /// Parse a raw string (trim mode) and evaluate it against the context.
    pub fn new(raw: impl Into<String>, context: &dyn TokenContext) -> Result<Self, WeftError> {
        let raw = raw.into();
        let tokens = parse_cached(&raw)?;

        let mut tokens_used = BTreeSet::new();
        collect_token_names(&tokens, &mut tokens_used);
        let is_mutable = contains_placeholder(&tokens);

        let mut this = Self {
            raw,
            tokens,
            value: String::new(),
            tokens_used,
            is_mutable,
            is_ready: true,
            diagnostics: Diagnostics::new(),
        };
        this.evaluate(context);
        Ok(this)
    }

    /// Re-evaluate against the context. Returns whether the value or the
    /// diagnostic state changed since the previous pass.
    pub fn update_context(&mut self, context: &dyn TokenContext) -> bool {
        if !self.is_mutable {
            // No placeholders, nothing can ever change.
            return false;
        }
        self.evaluate(context)
    }

    /// The raw input string.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The substituted value from the latest pass.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether every referenced name currently resolves.
    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    /// Whether the value can change across context updates.
    pub fn is_mutable(&self) -> bool {
        self.is_mutable
    }

    /// The set of placeholder names this template depends on.
    pub fn tokens_used(&self) -> &BTreeSet<TokenName> {
        &self.tokens_used
    }

    /// Diagnostic state from the latest pass.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn evaluate(&mut self, context: &dyn TokenContext) -> bool {
        let mut value = String::with_capacity(self.raw.len());
        let mut diagnostics = Diagnostics::new();
        eval_parts(&self.tokens, context, &mut value, &mut diagnostics);

        let changed = value != self.value || diagnostics != self.diagnostics;
        if changed {
            tracing::debug!(raw = %self.raw, value = %value, "token string changed");
        }

        self.value = value;
        self.is_ready = diagnostics.is_ok();
        self.diagnostics = diagnostics;
        changed
    }
}

impl Contextual for TokenString {
    fn update_context(&mut self, context: &dyn TokenContext) -> bool {
        TokenString::update_context(self, context)
    }

    fn is_mutable(&self) -> bool {
        self.is_mutable
    }

    fn is_ready(&self) -> bool {
        self.is_ready
    }

    fn tokens_used(&self) -> BTreeSet<TokenName> {
        self.tokens_used.clone()
    }

    fn diagnostic_state(&self) -> Diagnostics {
        self.diagnostics.clone()
    }
}

impl std::fmt::Debug for TokenString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenString")
            .field("raw", &self.raw)
            .field("value", &self.value)
            .field("is_ready", &self.is_ready)
            .field("is_mutable", &self.is_mutable)
            .finish()
    }
}

/// Convenience wrapper over [`TokenString::new`].
pub fn parse_template(
    raw: impl Into<String>,
    context: &dyn TokenContext,
) -> Result<TokenString, WeftError> {
    TokenString::new(raw, context)
}

/// Walk a token tree depth-first, substituting placeholder values.
///
/// Mutually recursive with argument resolution: a placeholder's argument
/// block is itself walked to a concrete string before the context is
/// queried.
fn eval_parts(
    parts: &[LexToken],
    context: &dyn TokenContext,
    out: &mut String,
    diagnostics: &mut Diagnostics,
) {
    for token in parts {
        match token {
            LexToken::Literal(text) => out.push_str(text),
            LexToken::Placeholder(placeholder) => {
                let args = placeholder.input_args.as_ref().map(|block| {
                    let mut text = String::new();
                    eval_parts(&block.parts, context, &mut text, diagnostics);
                    ArgumentList::parse(&text)
                });

                match context.resolve(&placeholder.name, args.as_ref()) {
                    Resolution::One(value) => out.push_str(&value),
                    Resolution::Many(_) => diagnostics.add_error(format!(
                        "token {placeholder} returned multiple values where a single value is required"
                    )),
                    Resolution::Unready => diagnostics.add_unready(placeholder.name.clone()),
                    Resolution::Unknown => diagnostics.add_invalid(placeholder.name.clone()),
                }
            }
        }
    }
}
