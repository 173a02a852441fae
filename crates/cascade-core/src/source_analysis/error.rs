// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Recognition failures raised by lexical and grammar rules.
//!
//! Neither kind of failure escapes the front-ends: the tokenizer turns a
//! [`LexError`] into an invalid token plus a diagnostic, and the parser turns
//! a [`RecognitionError`] into a diagnostic plus resynchronization.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

use super::{Span, Token, TokenSet};

/// A lexical error encountered while matching one token.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic(code(cascade::lexing))]
pub struct LexError {
    /// The kind of lexical error.
    #[source]
    pub kind: LexErrorKind,
    /// The characters the failed token covered.
    #[label("here")]
    pub span: Span,
}

impl LexError {
    /// Creates a new lexical error.
    #[must_use]
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the error with its span replaced.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// The kind of lexical error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A character no rule accepts at this point.
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    /// Input ended in the middle of a token.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A quoted string reached a newline or end of input.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A block comment reached end of input.
    #[error("unterminated comment")]
    UnterminatedComment,
}

impl LexErrorKind {
    /// The error describing whatever `found` is: a character or end of input.
    #[must_use]
    pub fn unexpected(found: Option<char>) -> Self {
        found.map_or(Self::UnexpectedEof, Self::UnexpectedCharacter)
    }
}

/// A grammar rule failed to match the token stream.
///
/// These are always raised explicitly; the parser never patches the token
/// stream to make a rule succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    /// A specific token kind was required.
    #[error("unexpected {} found, expected {expected}", .found.kind())]
    Mismatch {
        /// The kinds that would have matched.
        expected: TokenSet,
        /// The offending token.
        found: Token,
    },

    /// No alternative of a rule can start with the current token.
    #[error("unexpected {} found in {rule}", .found.kind())]
    NoViableAlternative {
        /// The rule being matched.
        rule: &'static str,
        /// The offending token.
        found: Token,
    },

    /// A construct is disabled for the session's dialect.
    #[error("{rule} is only allowed {predicate}")]
    FailedPredicate {
        /// The construct that was recognized.
        rule: &'static str,
        /// The dialect condition that failed.
        predicate: &'static str,
        /// The first token of the construct.
        found: Token,
    },

    /// Rule recursion exceeded the configured limit.
    #[error("nesting is too deep (maximum {limit} levels)")]
    NestingTooDeep {
        /// The configured limit.
        limit: usize,
        /// The token where the limit was hit.
        found: Token,
    },
}

impl RecognitionError {
    /// The token the failure was detected at.
    #[must_use]
    pub const fn token(&self) -> &Token {
        match self {
            Self::Mismatch { found, .. }
            | Self::NoViableAlternative { found, .. }
            | Self::FailedPredicate { found, .. }
            | Self::NestingTooDeep { found, .. } => found,
        }
    }

    /// Source location of the offending token.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.token().span()
    }
}
