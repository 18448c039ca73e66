//! Bit-to-token parser: bit sequence → lexical token tree
//!
//! Two calling modes:
//! - document mode: free text with zero or more `{{placeholder}}`
//!   occurrences; separator bits outside a placeholder are literal text.
//! - placeholder-body mode (`implied_braces`): the input is exactly one
//!   placeholder interior (name plus optional arguments) with no braces.
//!
//! Placeholders may nest inside argument lists (`{{Season: {{Other}} }}`).
//! Nesting is tracked by `{{`/`}}` depth only; `:` and `|` are never
//! nested-aware. That exact rule is load-bearing for existing content, so
//! don't "fix" it with full bracket matching.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{LexError, WeftError};
use crate::lexer::{split_bits, Bit, BitKind, END_PATTERN, START_PATTERN};
use crate::token_name::TokenName;

/// A parsed lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum LexToken {
    /// Plain text. Never produces a value lookup.
    Literal(String),
    /// A `{{name[: input]}}` reference to a named, context-resolved value.
    Placeholder(Placeholder),
}

/// A placeholder token: a name with an optional input-argument block.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    /// The referenced token name, trimmed, never empty.
    pub name: TokenName,
    /// The input-argument block, present iff the placeholder had any
    /// argument separator (it may still have zero parts).
    pub input_args: Option<InputArgs>,
    /// True when the outer `{{ }}` were assumed rather than present in the
    /// text (placeholder-body parsing mode).
    pub implied_braces: bool,
}

/// The argument section of a placeholder.
///
/// Parts are themselves literals and/or nested placeholders. In a closed sum
/// type a block can never occupy a token-sequence position, so this is a
/// struct owned by [`Placeholder`] rather than a `LexToken` variant.
#[derive(Debug, Clone, PartialEq)]
pub struct InputArgs {
    pub parts: Vec<LexToken>,
}

impl InputArgs {
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl fmt::Display for LexToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexToken::Literal(text) => f.write_str(text),
            LexToken::Placeholder(placeholder) => placeholder.fmt(f),
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.implied_braces {
            f.write_str(START_PATTERN)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(args) = &self.input_args {
            let text = args.to_string();
            // The |key=value shorthand keeps its own separator.
            if text.starts_with('|') {
                write!(f, " {text}")?;
            } else {
                write!(f, ": {text}")?;
            }
        }
        if !self.implied_braces {
            f.write_str(END_PATTERN)?;
        }
        Ok(())
    }
}

impl fmt::Display for InputArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            part.fmt(f)?;
        }
        Ok(())
    }
}

/// Lex and parse a raw string in one step.
///
/// Failures are wrapped with the raw field text so callers can report which
/// field was malformed.
pub fn parse_str(raw: &str, implied_braces: bool, trim: bool) -> Result<Vec<LexToken>, WeftError> {
    let bits = split_bits(raw);
    parse_bits(&bits, implied_braces, trim).map_err(|source| WeftError::Parse {
        raw: raw.to_string(),
        source,
    })
}

/// Parse a bit sequence into a lexical token tree.
pub fn parse_bits(
    bits: &[Bit<'_>],
    implied_braces: bool,
    trim: bool,
) -> Result<Vec<LexToken>, LexError> {
    let mut cursor = Cursor { bits, pos: 0 };
    let mut tokens = Vec::new();

    if implied_braces {
        let placeholder = extract_placeholder(&mut cursor, true)?;
        if cursor.peek().is_some() {
            return Err(LexError::TrailingInput {
                text: cursor.remaining_text(),
            });
        }
        tokens.push(LexToken::Placeholder(placeholder));
    } else {
        while let Some(bit) = cursor.peek() {
            if bit.kind == BitKind::StartPlaceholder {
                tokens.push(LexToken::Placeholder(extract_placeholder(
                    &mut cursor,
                    false,
                )?));
            } else {
                // Literal text, or a stray separator outside any placeholder.
                tokens.push(LexToken::Literal(bit.text.to_string()));
                cursor.advance();
            }
        }
    }

    normalize_literals(&mut tokens, trim);
    Ok(tokens)
}

/// Flatten every placeholder name reachable in a token tree, including
/// inside nested argument blocks.
pub fn collect_token_names(tokens: &[LexToken], names: &mut BTreeSet<TokenName>) {
    for token in tokens {
        if let LexToken::Placeholder(placeholder) = token {
            names.insert(placeholder.name.clone());
            if let Some(args) = &placeholder.input_args {
                collect_token_names(&args.parts, names);
            }
        }
    }
}

/// Whether a token tree contains at least one placeholder.
pub fn contains_placeholder(tokens: &[LexToken]) -> bool {
    tokens
        .iter()
        .any(|token| matches!(token, LexToken::Placeholder(_)))
}

struct Cursor<'b, 'a> {
    bits: &'b [Bit<'a>],
    pos: usize,
}

impl<'b, 'a> Cursor<'b, 'a> {
    fn peek(&self) -> Option<Bit<'a>> {
        self.bits.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn expect(&mut self, expected: BitKind) -> Result<Bit<'a>, LexError> {
        match self.peek() {
            Some(bit) if bit.kind == expected => {
                self.advance();
                Ok(bit)
            }
            Some(bit) => Err(LexError::UnexpectedBit {
                expected,
                found: bit.kind,
                text: bit.text.to_string(),
            }),
            None => Err(LexError::UnexpectedEnd { expected }),
        }
    }

    fn remaining_text(&self) -> String {
        self.bits[self.pos..]
            .iter()
            .map(|bit| bit.text)
            .collect()
    }
}

/// Extract one placeholder from the cursor.
fn extract_placeholder(
    cursor: &mut Cursor<'_, '_>,
    implied_braces: bool,
) -> Result<Placeholder, LexError> {
    if !implied_braces {
        cursor.expect(BitKind::StartPlaceholder)?;
    }

    let name_bit = cursor.expect(BitKind::Literal)?;
    let name = name_bit.text.trim();
    if name.is_empty() {
        return Err(LexError::EmptyName);
    }
    let name = TokenName::from(name);

    let input_args = match cursor.peek().map(|bit| bit.kind) {
        Some(BitKind::PositionalArgSeparator) => {
            cursor.advance();
            Some(extract_input_args(cursor)?)
        }
        // The `{{Token |key=value}}` shorthand: the `|` is not consumed here,
        // it stays part of the argument block text.
        Some(BitKind::NamedArgSeparator) => Some(extract_input_args(cursor)?),
        _ => None,
    };

    if !implied_braces {
        cursor.expect(BitKind::EndPlaceholder)?;
    }

    Ok(Placeholder {
        name,
        input_args,
        implied_braces,
    })
}

/// Extract the input-argument block for the current placeholder.
///
/// Collects bits until the enclosing placeholder's `}}`, tracking `{{`/`}}`
/// depth so nested placeholders keep their own braces. The collected buffer
/// is then parsed as a document of its own, in trim mode so human-authored
/// spacing around `:`/`|` stays out of literal output.
fn extract_input_args(cursor: &mut Cursor<'_, '_>) -> Result<InputArgs, LexError> {
    let mut buffer = Vec::new();
    let mut depth = 0usize;

    while let Some(bit) = cursor.peek() {
        match bit.kind {
            BitKind::StartPlaceholder => {
                depth += 1;
                buffer.push(bit);
                cursor.advance();
            }
            BitKind::EndPlaceholder => {
                if depth == 0 {
                    // The enclosing placeholder's closing brace.
                    break;
                }
                depth -= 1;
                buffer.push(bit);
                cursor.advance();
            }
            _ => {
                buffer.push(bit);
                cursor.advance();
            }
        }
    }

    let parts = parse_bits(&buffer, false, true)?;
    Ok(InputArgs { parts })
}

/// Normalize a finished token sequence: merge adjacent literal runs, then
/// (in trim mode) trim the outer edges, dropping an edge literal that
/// becomes empty.
fn normalize_literals(tokens: &mut Vec<LexToken>, trim: bool) {
    let mut i = 0;
    while i + 1 < tokens.len() {
        let adjacent_literals = matches!(
            (&tokens[i], &tokens[i + 1]),
            (LexToken::Literal(_), LexToken::Literal(_))
        );
        if adjacent_literals {
            if let LexToken::Literal(next) = tokens.remove(i + 1) {
                if let LexToken::Literal(text) = &mut tokens[i] {
                    text.push_str(&next);
                }
            }
        } else {
            i += 1;
        }
    }

    if !trim {
        return;
    }

    if let Some(LexToken::Literal(text)) = tokens.first_mut() {
        *text = text.trim_start().to_string();
        if text.is_empty() {
            tokens.remove(0);
        }
    }
    if let Some(LexToken::Literal(text)) = tokens.last_mut() {
        *text = text.trim_end().to_string();
        if text.is_empty() {
            tokens.pop();
        }
    }
}
