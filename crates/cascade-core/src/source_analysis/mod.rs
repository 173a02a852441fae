// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Tokenizing and parsing infrastructure for CSS, LESS and SCSS.
//!
//! # Character Streams
//!
//! [`SourceStream`] holds the source text and the cursor;
//! [`CaseFoldingStream`] upper-cases lookahead so lexical rules match
//! keywords case-insensitively while token text keeps its original case.
//!
//! # Lexical Analysis
//!
//! The [`Tokenizer`] converts source text into [`Token`]s by driving a
//! [`LexRules`] implementation ([`CssLexRules`] by default). Every byte of
//! input ends up in exactly one token; whitespace and comments travel on the
//! hidden [`Channel`].
//!
//! ```
//! use cascade_core::source_analysis::{Dialect, TokenKind, lex};
//!
//! let tokens = lex("a{b:c}", Dialect::Css);
//! assert_eq!(tokens.len(), 6);
//! assert_eq!(tokens[1].kind(), TokenKind::LBrace);
//! ```
//!
//! # Parsing
//!
//! The [`Parser`] front-end drives a [`Grammar`] ([`CssGrammar`] by default)
//! and reports structure to a [`ParseEventSink`]. Most callers use
//! [`ParseSession`](crate::ParseSession) instead, which wires the tokenizer,
//! the parser and the tree builder together.
//!
//! # Error Handling
//!
//! Neither front-end stops at the first problem. Unrecognized input becomes
//! [`TokenKind::Invalid`] tokens plus a [`DiagnosticCategory::Lexing`]
//! diagnostic; grammar failures become [`RecognitionError`]s that the parser
//! reports and then resynchronizes past.

mod char_stream;
mod diagnostic;
mod dialect;
mod error;
mod lexer;
mod parser;
mod span;
mod token;

// Property-based tests for the tokenizer
#[cfg(test)]
mod lexer_property_tests;

pub use char_stream::{CaseFoldingStream, CharStream, SourceStream, StreamMark};
pub use diagnostic::{Diagnostic, DiagnosticCategory, Severity};
pub use dialect::{
    CSS_MIME_TYPE, Dialect, DialectPredicates, LESS_MIME_TYPE, SCSS_MIME_TYPE, UnknownDialect,
};
pub use error::{LexError, LexErrorKind, RecognitionError};
pub use lexer::{
    CssLexRules, LexRules, LexerContext, LexerState, ReplaySource, TokenSource, Tokenizer, lex,
    lex_with_eof,
};
pub use parser::{
    CssGrammar, Grammar, MAX_NESTING_DEPTH, ParseEventSink, Parser, ParserState, Rule, RuleResult,
    TokenStream,
};
pub use span::Span;
pub use token::{Channel, Token, TokenKind, TokenSet};
