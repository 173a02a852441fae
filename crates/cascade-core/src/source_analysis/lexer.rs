// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Tokenizer front-end.
//!
//! The [`Tokenizer`] drives a [`LexRules`] implementation once per token and
//! guarantees that the resulting token sequence covers the source without
//! gaps: when the rules fail to recognize input, the failed span becomes a
//! [`TokenKind::Invalid`] token and a [`DiagnosticCategory::Lexing`]
//! diagnostic is recorded.
//!
//! # Design Principles
//!
//! - **Error recovery**: a lexing failure never ends the session
//! - **Contiguous coverage**: every byte of input belongs to exactly one token
//! - **Guaranteed progress**: each call consumes input or returns `Eof`
//!
//! # Example
//!
//! ```
//! use cascade_core::source_analysis::{Dialect, Tokenizer, TokenKind};
//!
//! let mut tokenizer = Tokenizer::new("a { color: red }", Dialect::Css);
//! let kinds: Vec<_> = tokenizer.by_ref().filter(|t| !t.is_hidden()).map(|t| t.kind()).collect();
//! assert_eq!(kinds[0], TokenKind::Ident);
//! assert!(tokenizer.diagnostics().is_empty());
//! ```
//!
//! [`DiagnosticCategory::Lexing`]: super::DiagnosticCategory::Lexing

mod rules;

use std::sync::Arc;

use tracing::{debug, trace};

use super::char_stream::{CaseFoldingStream, CharStream};
use super::{
    Channel, Diagnostic, Dialect, DialectPredicates, LexError, LexErrorKind, Span, Token,
    TokenKind,
};

pub use rules::CssLexRules;

/// Lexical rules: the token-matching half of a rule engine.
///
/// `match_token` is called with the stream positioned at the start of a new
/// token and at least one character available. On success it has consumed
/// the token's characters and either set a kind, requested a skip, or
/// emitted a complete token through the context. On failure the front-end
/// takes over recovery.
pub trait LexRules {
    /// Matches a single token.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] when no lexical rule accepts the input.
    fn match_token(&self, ctx: &mut LexerContext<'_>) -> Result<(), LexError>;
}

/// Per-token scratch state shared between the front-end and the rules.
#[derive(Debug, Clone)]
pub struct LexerState {
    /// A token emitted explicitly by the rules.
    pub token: Option<Token>,
    /// Kind of the default token.
    pub kind: TokenKind,
    /// Channel of the default token.
    pub channel: Channel,
    /// Skip marker: discard the matched text and match again.
    pub skip: bool,
    /// Byte offset where the token starts.
    pub start_offset: u32,
    /// Line where the token starts.
    pub start_line: u32,
    /// Column where the token starts.
    pub start_column: u32,
}

impl LexerState {
    fn new() -> Self {
        Self {
            token: None,
            kind: TokenKind::Invalid,
            channel: Channel::Default,
            skip: false,
            start_offset: 0,
            start_line: 1,
            start_column: 0,
        }
    }

    fn reset(&mut self, input: &impl CharStream) {
        self.token = None;
        self.kind = TokenKind::Invalid;
        self.channel = Channel::Default;
        self.skip = false;
        self.start_offset = input.offset();
        self.start_line = input.line();
        self.start_column = input.column();
    }

    fn span_to(&self, end: u32) -> Span {
        Span::new(self.start_offset, end)
    }
}

/// The view of the input and scratch state handed to [`LexRules`].
pub struct LexerContext<'a> {
    input: &'a mut CaseFoldingStream,
    state: &'a mut LexerState,
    dialect: Dialect,
}

impl LexerContext<'_> {
    /// Upper-cased lookahead (see [`CharStream::la`]).
    #[must_use]
    pub fn la(&self, i: isize) -> Option<char> {
        self.input.la(i)
    }

    /// The next character in its original case.
    #[must_use]
    pub fn current_char(&self) -> Option<char> {
        let offset = self.input.offset() as usize;
        self.input.source().get(offset..)?.chars().next()
    }

    /// Consumes one character.
    pub fn consume(&mut self) {
        self.input.consume();
    }

    /// Consumes `n` characters.
    pub fn consume_n(&mut self, n: usize) {
        for _ in 0..n {
            self.input.consume();
        }
    }

    /// Consumes characters while `predicate` holds for the folded lookahead.
    pub fn consume_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.la(1).is_some_and(&predicate) {
            self.input.consume();
        }
    }

    /// True if the folded lookahead starts with `expected` (upper case).
    #[must_use]
    pub fn lookahead_is(&self, expected: &str) -> bool {
        self.lookahead_is_at(1, expected)
    }

    /// True if the folded lookahead starting at `la(at)` spells `expected`.
    #[must_use]
    pub fn lookahead_is_at(&self, at: isize, expected: &str) -> bool {
        expected
            .chars()
            .zip(at..)
            .all(|(c, i)| self.la(i) == Some(c))
    }

    /// Consumes `expected` (upper case) or fails at the first mismatch.
    ///
    /// # Errors
    ///
    /// Returns an "unexpected character" error for the first character that
    /// does not match.
    pub fn match_str(&mut self, expected: &str) -> Result<(), LexError> {
        for c in expected.chars() {
            if self.la(1) != Some(c) {
                return Err(self.unexpected());
            }
            self.input.consume();
        }
        Ok(())
    }

    /// Byte offset of the cursor.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.input.offset()
    }

    /// Original-case text consumed so far for the current token.
    #[must_use]
    pub fn text(&self) -> &str {
        self.input
            .substring(self.state.span_to(self.input.offset()))
    }

    /// Sets the kind of the default token.
    pub fn set_kind(&mut self, kind: TokenKind) {
        self.state.kind = kind;
    }

    /// Sets the kind and moves the default token to the hidden channel.
    pub fn set_hidden(&mut self, kind: TokenKind) {
        self.state.kind = kind;
        self.state.channel = Channel::Hidden;
    }

    /// Requests that the matched text be discarded.
    pub fn skip(&mut self) {
        self.state.skip = true;
    }

    /// Emits a complete token instead of the default one.
    pub fn emit(&mut self, token: Token) {
        self.state.token = Some(token);
    }

    /// A default-shaped token of `kind` spanning the text matched so far.
    #[must_use]
    pub fn token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            self.state.span_to(self.input.offset()),
            self.state.start_line,
            self.state.start_column,
        )
    }

    /// An error of `kind` spanning the text matched so far.
    #[must_use]
    pub fn error(&self, kind: LexErrorKind) -> LexError {
        LexError::new(kind, self.state.span_to(self.input.offset()))
    }

    /// An error naming the next character (or end of input).
    #[must_use]
    pub fn unexpected(&self) -> LexError {
        self.error(LexErrorKind::unexpected(self.current_char()))
    }
}

impl DialectPredicates for LexerContext<'_> {
    fn is_less_source(&self) -> bool {
        self.dialect.is_less()
    }

    fn is_scss_source(&self) -> bool {
        self.dialect.is_scss()
    }
}

/// Anything that can feed tokens to the parser front-end.
///
/// Implementations return `Eof` forever once their input is exhausted.
pub trait TokenSource {
    /// Returns the next token.
    fn next_token(&mut self) -> Token;
}

/// Tokenizer front-end over the case-folding stream.
pub struct Tokenizer<R = CssLexRules> {
    input: CaseFoldingStream,
    rules: R,
    state: LexerState,
    dialect: Dialect,
    diagnostics: Vec<Diagnostic>,
    finished: bool,
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("offset", &self.input.offset())
            .field("dialect", &self.dialect)
            .field("diagnostics", &self.diagnostics.len())
            .finish_non_exhaustive()
    }
}

impl Tokenizer<CssLexRules> {
    /// Creates a tokenizer using the built-in CSS/LESS/SCSS rules.
    #[must_use]
    pub fn new(source: impl Into<Arc<str>>, dialect: Dialect) -> Self {
        Self::with_rules(source, dialect, CssLexRules)
    }
}

impl<R: LexRules> Tokenizer<R> {
    /// Creates a tokenizer driving custom lexical rules.
    #[must_use]
    pub fn with_rules(source: impl Into<Arc<str>>, dialect: Dialect, rules: R) -> Self {
        Self {
            input: CaseFoldingStream::from_source(source),
            rules,
            state: LexerState::new(),
            dialect,
            diagnostics: Vec::new(),
            finished: false,
        }
    }

    /// The session dialect.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The shared source text.
    #[must_use]
    pub fn source(&self) -> Arc<str> {
        self.input.inner().shared_source()
    }

    /// Lexing diagnostics recorded so far, in input order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Takes the recorded diagnostics, leaving the list empty.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Returns the next token, or `Eof` (repeatedly) once input is exhausted.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.state.reset(&self.input);

            if self.input.la(1).is_none() {
                return Token::new(
                    TokenKind::Eof,
                    Span::at(self.input.offset()),
                    self.input.line(),
                    self.input.column(),
                );
            }

            let result = {
                let mut ctx = LexerContext {
                    input: &mut self.input,
                    state: &mut self.state,
                    dialect: self.dialect,
                };
                self.rules.match_token(&mut ctx)
            };

            match result {
                Ok(()) => {
                    if let Some(token) = self.state.token.take() {
                        return token;
                    }
                    let end = self.input.offset();
                    if end == self.state.start_offset {
                        // A rule that matches nothing would stall the stream.
                        let current = self.input.source()[end as usize..].chars().next();
                        let err = LexError::new(LexErrorKind::unexpected(current), Span::at(end));
                        return self.recover(err);
                    }
                    if self.state.skip {
                        continue;
                    }
                    let token = Token::new(
                        self.state.kind,
                        self.state.span_to(end),
                        self.state.start_line,
                        self.state.start_column,
                    )
                    .with_channel(self.state.channel);
                    trace!(token = %token, "token");
                    return token;
                }
                Err(err) => return self.recover(err),
            }
        }
    }

    /// Records the failure and turns the failed span into an invalid token.
    fn recover(&mut self, err: LexError) -> Token {
        if self.input.offset() == self.state.start_offset {
            self.input.consume();
        }
        let span = self.state.span_to(self.input.offset());
        let err = err.with_span(span);
        debug!(
            start = span.start(),
            end = span.end(),
            error = %err,
            "lexing failure, emitting invalid token"
        );
        self.diagnostics.push(Diagnostic::from(&err));
        Token::new(
            TokenKind::Invalid,
            span,
            self.state.start_line,
            self.state.start_column,
        )
    }
}

impl<R: LexRules> TokenSource for Tokenizer<R> {
    fn next_token(&mut self) -> Token {
        Tokenizer::next_token(self)
    }
}

impl<R: LexRules> Iterator for Tokenizer<R> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind().is_eof() {
            self.finished = true;
            None
        } else {
            Some(token)
        }
    }
}

/// Replays a pre-recorded token sequence.
///
/// If the recording does not end with `Eof`, one is synthesized after the
/// last token.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    tokens: std::vec::IntoIter<Token>,
    eof: Token,
}

impl ReplaySource {
    /// Creates a source replaying `tokens` in order.
    #[must_use]
    pub fn new(mut tokens: Vec<Token>) -> Self {
        let eof = match tokens.last() {
            Some(last) if last.kind().is_eof() => tokens.pop(),
            _ => None,
        };
        let eof = eof.unwrap_or_else(|| {
            let end = tokens.last().map_or(0, |t| t.span().end());
            let line = tokens.last().map_or(1, Token::line);
            Token::new(TokenKind::Eof, Span::at(end), line, 0)
        });
        Self {
            tokens: tokens.into_iter(),
            eof,
        }
    }
}

impl TokenSource for ReplaySource {
    fn next_token(&mut self) -> Token {
        self.tokens.next().unwrap_or_else(|| self.eof.clone())
    }
}

/// Tokenizes `source`, including hidden tokens but excluding `Eof`.
#[must_use]
pub fn lex(source: &str, dialect: Dialect) -> Vec<Token> {
    Tokenizer::new(source, dialect).collect()
}

/// Tokenizes `source`, ending with the `Eof` token.
#[must_use]
pub fn lex_with_eof(source: &str, dialect: Dialect) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(source, dialect);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token();
        let done = token.kind().is_eof();
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}
