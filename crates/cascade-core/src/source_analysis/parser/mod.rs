// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Error-tolerant parser front-end.
//!
//! The [`Parser`] drives a [`Grammar`] over a buffered [`TokenStream`] and
//! forwards every structural event to a [`ParseEventSink`] (normally the
//! tree builder). It prints nothing and never repairs input by itself.
//!
//! # Design Philosophy
//!
//! - **No automatic repair**: [`Parser::expect`] either consumes the required
//!   token or returns [`RecognitionError::Mismatch`]; tokens are never
//!   invented or dropped to make a rule succeed
//! - **Errors go to the sink**: [`Parser::report_error`] is the only way a
//!   failure leaves the parser
//! - **Explicit resynchronization**: [`Parser::consume_until`] skips to a
//!   follow set chosen by the grammar at each call site, and hands every
//!   skipped token to the sink in one batch
//! - **Guaranteed termination**: every resync iteration consumes one token,
//!   and [`Parser::skip_one`] lets grammar loops force progress
//!
//! # Recovery pattern
//!
//! Grammar rules return `Result<_, RecognitionError>` and propagate failures
//! with `?`. Rules that own a natural synchronization point catch them:
//!
//! ```
//! use cascade_core::source_analysis::{
//!     Dialect, Grammar, ParseEventSink, Parser, RecognitionError, Rule, TokenKind,
//!     TokenSet, TokenStream, lex_with_eof,
//! };
//!
//! /// `ident ;` repeated.
//! struct Statements;
//!
//! impl Grammar for Statements {
//!     fn parse(&self, p: &mut Parser<'_>) -> Result<(), RecognitionError> {
//!         const FOLLOW: TokenSet = TokenSet::of(&[TokenKind::Semi]);
//!         while !p.at(TokenKind::Eof) {
//!             let result = p.rule(Rule::Declaration, |p| {
//!                 p.expect(TokenKind::Ident)?;
//!                 p.expect(TokenKind::Semi)?;
//!                 Ok(())
//!             });
//!             p.recover(result, FOLLOW);
//!             if p.at(TokenKind::Semi) {
//!                 p.consume();
//!             }
//!         }
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Default)]
//! struct CountErrors(usize);
//!
//! impl ParseEventSink for CountErrors {
//!     fn recognition_error(&mut self, _error: &RecognitionError) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut sink = CountErrors::default();
//! let stream = TokenStream::new(lex_with_eof("a; 1 2; b;", Dialect::Css));
//! Parser::new(stream, Dialect::Css, &mut sink).run(&Statements);
//! assert_eq!(sink.0, 1);
//! ```

use tracing::{debug, trace};

use super::{
    DialectPredicates, Dialect, RecognitionError, Token, TokenKind, TokenSet, TokenSource,
};

mod declarations;
mod rule;
mod selectors;
mod stylesheet;


pub use rule::Rule;
pub use stylesheet::CssGrammar;

/// Maximum number of nested grammar-rule frames before the parser bails out.
///
/// Prevents stack overflow on deeply nested input (e.g. `a(a(a(...)))` or
/// deeply nested LESS rules). One level of stylesheet nesting costs around
/// four rule frames, so this allows roughly 60 levels of nested blocks.
///
/// As a second line of defence, `stacker::maybe_grow` is used at every rule
/// entry so the stack is extended on the heap if needed.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Result type of grammar rules.
pub type RuleResult<T = ()> = Result<T, RecognitionError>;

/// A grammar: the rule-matching half of a rule engine.
pub trait Grammar {
    /// Parses the whole token stream from its top-level rule.
    ///
    /// # Errors
    ///
    /// A failure that escapes the top-level rule is reported by
    /// [`Parser::run`], which then skips the remaining input.
    fn parse(&self, parser: &mut Parser<'_>) -> RuleResult;
}

/// Receives structural events while a [`Parser`] runs.
///
/// Every method has a no-op default so sinks implement only what they need.
pub trait ParseEventSink {
    /// A grammar rule was entered.
    fn enter_rule(&mut self, rule: Rule) {
        let _ = rule;
    }

    /// The most recently entered rule was exited, successfully or not.
    fn exit_rule(&mut self, rule: Rule) {
        let _ = rule;
    }

    /// A token was matched by the grammar.
    fn consume_token(&mut self, token: &Token) {
        let _ = token;
    }

    /// A recognition failure was reported.
    fn recognition_error(&mut self, error: &RecognitionError) {
        let _ = error;
    }

    /// Resynchronization is starting.
    fn begin_resync(&mut self) {}

    /// Resynchronization has finished.
    fn end_resync(&mut self) {}

    /// The tokens skipped by one resynchronization, in input order.
    /// Called exactly once between [`begin_resync`](Self::begin_resync) and
    /// [`end_resync`](Self::end_resync), possibly with an empty slice.
    fn consume_skipped_tokens(&mut self, tokens: &[Token]) {
        let _ = tokens;
    }
}

/// Where a parse attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserState {
    /// Matching tokens against grammar rules.
    Matching,
    /// Skipping tokens after a recognition failure.
    Resyncing,
    /// End of input reached; nothing is left to match.
    Terminal,
}

/// A fully buffered token sequence with lookahead over visible tokens.
///
/// Hidden-channel tokens stay in the buffer (so the recorded stream still
/// covers the input) but lookahead and consumption skip over them.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    eof: Token,
    /// Buffer indices of the visible tokens, in order.
    visible: Vec<usize>,
    /// Position in `visible` of the current token.
    cursor: usize,
    /// Buffer index of the current visible token, or `tokens.len()` at end.
    index: usize,
}

impl TokenStream {
    /// Buffers `tokens`. A trailing `Eof` is split off (and synthesized if
    /// missing).
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut source = super::ReplaySource::new(tokens);
        Self::from_source(&mut source)
    }

    /// Drains `source` up to and including its `Eof` token.
    pub fn from_source(source: &mut dyn TokenSource) -> Self {
        let mut tokens = Vec::new();
        let eof = loop {
            let token = source.next_token();
            if token.kind().is_eof() {
                break token;
            }
            tokens.push(token);
        };
        let visible: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_hidden())
            .map(|(i, _)| i)
            .collect();
        let index = visible.first().copied().unwrap_or(tokens.len());
        Self {
            tokens,
            eof,
            visible,
            cursor: 0,
            index,
        }
    }

    /// The `k`-th visible token from the cursor (`k >= 1`); `Eof` past the end.
    #[must_use]
    pub fn lt(&self, k: usize) -> &Token {
        self.visible
            .get(self.cursor + k.max(1) - 1)
            .and_then(|&i| self.tokens.get(i))
            .unwrap_or(&self.eof)
    }

    /// Kind of [`TokenStream::lt`].
    #[must_use]
    pub fn la(&self, k: usize) -> TokenKind {
        self.lt(k).kind()
    }

    /// First visible token kind in `set` at or after the cursor, walking
    /// the buffer once.
    #[must_use]
    pub fn first_of(&self, set: TokenSet) -> Option<TokenKind> {
        self.visible
            .get(self.cursor..)
            .unwrap_or_default()
            .iter()
            .map(|&i| self.tokens[i].kind())
            .find(|kind| set.contains(*kind))
            .or_else(|| set.contains(TokenKind::Eof).then_some(TokenKind::Eof))
    }

    /// Consumes and returns the current visible token. At end of input the
    /// cursor stays put and `Eof` is returned.
    pub fn consume(&mut self) -> Token {
        let token = self.lt(1).clone();
        if self.cursor < self.visible.len() {
            self.cursor += 1;
            self.index = self
                .visible
                .get(self.cursor)
                .copied()
                .unwrap_or(self.tokens.len());
        }
        token
    }

    /// Buffer index of the cursor; strictly increases with every consume.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.index
    }

    /// True if a hidden token (whitespace or comment) directly precedes the
    /// current token.
    #[must_use]
    pub fn preceded_by_hidden(&self) -> bool {
        self.index
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .is_some_and(Token::is_hidden)
    }

    /// The end-of-input token.
    #[must_use]
    pub const fn eof(&self) -> &Token {
        &self.eof
    }

    /// All buffered tokens, hidden ones included, without `Eof`.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Unwraps the buffer, appending `Eof`.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        let mut tokens = self.tokens;
        tokens.push(self.eof);
        tokens
    }
}

/// The parser front-end.
pub struct Parser<'s> {
    stream: TokenStream,
    sink: &'s mut dyn ParseEventSink,
    dialect: Dialect,
    state: ParserState,
    depth: usize,
    max_depth: usize,
}

impl std::fmt::Debug for Parser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("position", &self.stream.position())
            .field("dialect", &self.dialect)
            .field("state", &self.state)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl<'s> Parser<'s> {
    /// Creates a parser over `stream` reporting to `sink`.
    pub fn new(stream: TokenStream, dialect: Dialect, sink: &'s mut dyn ParseEventSink) -> Self {
        Self {
            stream,
            sink,
            dialect,
            state: ParserState::Matching,
            depth: 0,
            max_depth: MAX_NESTING_DEPTH,
        }
    }

    /// Overrides [`MAX_NESTING_DEPTH`].
    #[must_use]
    pub fn with_max_nesting_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Runs `grammar` to completion and returns the consumed stream.
    ///
    /// A failure escaping the grammar, or input the grammar left unread, is
    /// reported and skipped to end of input. The parser always ends in
    /// [`ParserState::Terminal`].
    pub fn run(mut self, grammar: &dyn Grammar) -> TokenStream {
        if let Err(err) = grammar.parse(&mut self) {
            self.report_error(&err);
            self.consume_until(TokenSet::EMPTY);
        }
        if !self.at(TokenKind::Eof) {
            let err = self.mismatch(TokenSet::of(&[TokenKind::Eof]));
            self.report_error(&err);
            self.consume_until(TokenSet::EMPTY);
        }
        self.state = ParserState::Terminal;
        debug!(tokens = self.stream.tokens().len(), "parse finished");
        self.stream
    }

    /// The session dialect.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> ParserState {
        self.state
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// The current (next unconsumed) visible token.
    #[must_use]
    pub fn current(&self) -> &Token {
        self.stream.lt(1)
    }

    /// The `k`-th visible token from the cursor (`k >= 1`).
    #[must_use]
    pub fn lt(&self, k: usize) -> &Token {
        self.stream.lt(k)
    }

    /// Kind of the `k`-th visible token from the cursor (`k >= 1`).
    #[must_use]
    pub fn la(&self, k: usize) -> TokenKind {
        self.stream.la(k)
    }

    /// True if the current token is of `kind`.
    #[must_use]
    pub fn at(&self, kind: TokenKind) -> bool {
        self.la(1) == kind
    }

    /// True if the current token's kind is in `set`.
    #[must_use]
    pub fn at_any(&self, set: TokenSet) -> bool {
        set.contains(self.la(1))
    }

    /// See [`TokenStream::position`].
    #[must_use]
    pub const fn position(&self) -> usize {
        self.stream.position()
    }

    /// See [`TokenStream::preceded_by_hidden`].
    #[must_use]
    pub fn preceded_by_hidden(&self) -> bool {
        self.stream.preceded_by_hidden()
    }

    /// Scans forward and returns the first visible token kind in `set`, or
    /// `None` if end of input comes first. Consumes nothing.
    #[must_use]
    pub fn first_of(&self, set: TokenSet) -> Option<TokenKind> {
        self.stream.first_of(set)
    }

    /// Consumes the current token and reports it to the sink.
    pub fn consume(&mut self) -> Token {
        let token = self.stream.consume();
        if !token.kind().is_eof() {
            trace!(token = %token, "consume");
            self.sink.consume_token(&token);
        }
        token
    }

    /// Consumes a token of `kind` or fails with a mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`RecognitionError::Mismatch`] without consuming anything if
    /// the current token is not of `kind`.
    pub fn expect(&mut self, kind: TokenKind) -> RuleResult<Token> {
        self.expect_any(TokenSet::of(&[kind]))
    }

    /// Consumes a token whose kind is in `set` or fails with a mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`RecognitionError::Mismatch`] without consuming anything if
    /// the current token's kind is not in `set`.
    pub fn expect_any(&mut self, set: TokenSet) -> RuleResult<Token> {
        if self.at_any(set) {
            Ok(self.consume())
        } else {
            Err(self.mismatch(set))
        }
    }

    /// Succeeds if the current token is in `set`, consuming nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RecognitionError::Mismatch`] otherwise.
    pub fn check_any(&self, set: TokenSet) -> RuleResult {
        if self.at_any(set) {
            Ok(())
        } else {
            Err(self.mismatch(set))
        }
    }

    // ========================================================================
    // Error Construction
    // ========================================================================

    /// A mismatch at the current token.
    #[must_use]
    pub fn mismatch(&self, expected: TokenSet) -> RecognitionError {
        RecognitionError::Mismatch {
            expected,
            found: self.current().clone(),
        }
    }

    /// A no-viable-alternative failure of `rule` at the current token.
    #[must_use]
    pub fn no_viable_alternative(&self, rule: &'static str) -> RecognitionError {
        RecognitionError::NoViableAlternative {
            rule,
            found: self.current().clone(),
        }
    }

    /// A dialect predicate failure for `rule` at the current token.
    #[must_use]
    pub fn failed_predicate(&self, rule: &'static str, predicate: &'static str) -> RecognitionError {
        RecognitionError::FailedPredicate {
            rule,
            predicate,
            found: self.current().clone(),
        }
    }

    // ========================================================================
    // Error Handling & Recovery
    // ========================================================================

    /// Forwards a recognition failure to the sink. Prints nothing.
    pub fn report_error(&mut self, error: &RecognitionError) {
        debug!(
            start = error.span().start(),
            end = error.span().end(),
            error = %error,
            "recognition error"
        );
        self.sink.recognition_error(error);
    }

    /// Skips tokens until end of input or a token whose kind is in `follow`.
    ///
    /// The skipped tokens are handed to the sink in one
    /// [`ParseEventSink::consume_skipped_tokens`] call, bracketed by
    /// [`begin_resync`](ParseEventSink::begin_resync) and
    /// [`end_resync`](ParseEventSink::end_resync). Reaching end of input
    /// without finding a follow token moves the parser to
    /// [`ParserState::Terminal`].
    pub fn consume_until(&mut self, follow: TokenSet) {
        if self.state != ParserState::Terminal {
            self.state = ParserState::Resyncing;
        }
        self.sink.begin_resync();
        let mut skipped = Vec::new();
        while !self.at(TokenKind::Eof) && !self.at_any(follow) {
            skipped.push(self.stream.consume());
        }
        debug!(
            skipped = skipped.len(),
            follow = %follow,
            stopped_at = %self.la(1),
            "resynchronized"
        );
        self.sink.consume_skipped_tokens(&skipped);
        self.sink.end_resync();
        let reached_end = self.at(TokenKind::Eof) && !follow.contains(TokenKind::Eof);
        self.state = if reached_end || self.state == ParserState::Terminal {
            ParserState::Terminal
        } else {
            ParserState::Matching
        };
    }

    /// Skips exactly one token as a resynchronization. Does nothing at end
    /// of input.
    ///
    /// Grammar loops use this when a failed item left the cursor on a token
    /// the loop cannot consume, so every iteration makes progress.
    pub fn skip_one(&mut self) {
        if self.at(TokenKind::Eof) {
            return;
        }
        self.sink.begin_resync();
        let token = self.stream.consume();
        debug!(token = %token, "skipped one token");
        self.sink.consume_skipped_tokens(std::slice::from_ref(&token));
        self.sink.end_resync();
    }

    /// Reports a failed `result` and resynchronizes to `follow`.
    pub fn recover<T>(&mut self, result: RuleResult<T>, follow: TokenSet) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.report_error(&err);
                self.consume_until(follow);
                None
            }
        }
    }

    // ========================================================================
    // Rule Frames
    // ========================================================================

    /// Runs `body` inside a `rule` frame.
    ///
    /// The sink sees `enter_rule` and `exit_rule` around `body` even when it
    /// fails. Exceeding the nesting limit fails with
    /// [`RecognitionError::NestingTooDeep`] before the rule is entered.
    ///
    /// # Errors
    ///
    /// Propagates the failure of `body`.
    pub fn rule<T>(
        &mut self,
        rule: Rule,
        body: impl FnOnce(&mut Self) -> RuleResult<T>,
    ) -> RuleResult<T> {
        if self.depth >= self.max_depth {
            return Err(RecognitionError::NestingTooDeep {
                limit: self.max_depth,
                found: self.current().clone(),
            });
        }
        self.depth += 1;
        self.sink.enter_rule(rule);
        let result = stacker::maybe_grow(32 * 1024, 256 * 1024, || body(&mut *self));
        self.sink.exit_rule(rule);
        self.depth -= 1;
        result
    }

    /// A rule frame holding just the current token.
    ///
    /// # Errors
    ///
    /// Only fails when the nesting limit is reached.
    pub fn token_rule(&mut self, rule: Rule) -> RuleResult<Token> {
        self.rule(rule, |p| Ok(p.consume()))
    }
}

impl DialectPredicates for Parser<'_> {
    fn is_less_source(&self) -> bool {
        self.dialect.is_less()
    }

    fn is_scss_source(&self) -> bool {
        self.dialect.is_scss()
    }
}
