// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Parse sessions: one source text, one dialect, one parse.
//!
//! A [`ParseSession`] wires the [`Tokenizer`], the [`Parser`] and the
//! [`ParseTreeBuilder`] together and hands back a [`ParseResult`] that owns
//! everything it produced.
//!
//! ```
//! use cascade_core::{ParseSession, tree::NodeKind};
//!
//! let result = ParseSession::new("@var: 1px;", Some("text/less")).parse();
//! assert!(!result.has_errors());
//!
//! let result = ParseSession::new("@var: 1px;", None).parse();
//! assert!(result.has_errors());
//! assert!(result.tree.root().descendants().any(|n| n.kind() == NodeKind::Recovery));
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::source_analysis::{
    CssGrammar, CssLexRules, Diagnostic, Dialect, Grammar, LexRules, MAX_NESTING_DEPTH, Parser,
    ReplaySource, Token, TokenStream, Tokenizer,
};
use crate::tree::{ParseTree, ParseTreeBuilder};

/// Per-session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Which LESS/SCSS rules are enabled.
    pub dialect: Dialect,
    /// Maximum number of nested grammar-rule frames.
    pub max_nesting_depth: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::Css,
            max_nesting_depth: MAX_NESTING_DEPTH,
        }
    }
}

impl SessionOptions {
    /// Plain CSS with the default nesting limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a media type such as `text/less`; unknown or missing
    /// types mean plain CSS.
    #[must_use]
    pub fn from_mime_type(mime_type: Option<&str>) -> Self {
        Self::new().with_dialect(Dialect::from_mime_type(mime_type))
    }

    /// Sets the dialect.
    #[must_use]
    pub const fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets the nesting limit.
    #[must_use]
    pub const fn with_max_nesting_depth(mut self, max_nesting_depth: usize) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }
}

/// Everything one parse produced.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The parse tree.
    pub tree: ParseTree,
    /// Every token, hidden ones included, ending with `Eof`.
    pub tokens: Vec<Token>,
    /// Lexing and recognition failures, ordered by start offset.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// True if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// The source text the tree refers to.
    #[must_use]
    pub fn source(&self) -> &str {
        self.tree.source()
    }
}

/// A single parse of one source text.
#[derive(Debug, Clone)]
pub struct ParseSession {
    source: Arc<str>,
    options: SessionOptions,
}

impl ParseSession {
    /// Creates a session whose dialect comes from `mime_type`
    /// (`text/css`, `text/less` or `text/scss`).
    #[must_use]
    pub fn new(source: impl Into<Arc<str>>, mime_type: Option<&str>) -> Self {
        Self::with_options(source, SessionOptions::from_mime_type(mime_type))
    }

    /// Creates a session with explicit options.
    #[must_use]
    pub fn with_options(source: impl Into<Arc<str>>, options: SessionOptions) -> Self {
        Self {
            source: source.into(),
            options,
        }
    }

    /// The session dialect.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.options.dialect
    }

    /// The session options.
    #[must_use]
    pub const fn options(&self) -> SessionOptions {
        self.options
    }

    /// The source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Tokenizes and parses with the built-in CSS/LESS/SCSS rules.
    #[must_use]
    pub fn parse(self) -> ParseResult {
        self.parse_with(CssLexRules, &CssGrammar)
    }

    /// Tokenizes with `rules` and parses with `grammar`.
    #[must_use]
    pub fn parse_with<R: LexRules>(self, rules: R, grammar: &dyn Grammar) -> ParseResult {
        let mut tokenizer =
            Tokenizer::with_rules(Arc::clone(&self.source), self.options.dialect, rules);
        let stream = TokenStream::from_source(&mut tokenizer);
        let lexing = tokenizer.take_diagnostics();
        self.finish(stream, lexing, grammar)
    }

    /// Parses an already tokenized stream, for example one recorded from an
    /// earlier session over the same source. A missing trailing `Eof` is
    /// synthesized. Lexing diagnostics are not available here.
    #[must_use]
    pub fn parse_tokens(self, tokens: Vec<Token>, grammar: &dyn Grammar) -> ParseResult {
        let mut source = ReplaySource::new(tokens);
        let stream = TokenStream::from_source(&mut source);
        self.finish(stream, Vec::new(), grammar)
    }

    fn finish(
        self,
        stream: TokenStream,
        lexing: Vec<Diagnostic>,
        grammar: &dyn Grammar,
    ) -> ParseResult {
        let mut builder = ParseTreeBuilder::new(Arc::clone(&self.source));
        let stream = Parser::new(stream, self.options.dialect, &mut builder)
            .with_max_nesting_depth(self.options.max_nesting_depth)
            .run(grammar);
        let (tree, parsing) = builder.finish();

        let mut diagnostics = lexing;
        diagnostics.extend(parsing);
        diagnostics.sort_by_key(Diagnostic::start);

        debug!(
            dialect = %self.options.dialect,
            bytes = self.source.len(),
            diagnostics = diagnostics.len(),
            "parsed stylesheet"
        );
        ParseResult {
            tree,
            tokens: stream.into_tokens(),
            diagnostics,
        }
    }
}

/// Parses `source` in the dialect named by `mime_type`.
///
/// ```
/// let result = cascade_core::parse_source("a { color: red; }", None);
/// assert!(result.diagnostics.is_empty());
/// assert_eq!(result.tree.query("styleSheet/body/bodyItem/rule/selectorsGroup").map(|n| n.image()), Some("a"));
/// ```
#[must_use]
pub fn parse_source(source: &str, mime_type: Option<&str>) -> ParseResult {
    ParseSession::new(source, mime_type).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{DiagnosticCategory, TokenKind};
    use crate::tree::NodeKind;

    #[test]
    fn options_from_mime_type() {
        assert_eq!(
            SessionOptions::from_mime_type(Some("text/scss")).dialect,
            Dialect::Scss
        );
        assert_eq!(SessionOptions::from_mime_type(None), SessionOptions::default());
        let options = SessionOptions::new().with_max_nesting_depth(8);
        assert_eq!(options.max_nesting_depth, 8);
    }

    #[test]
    fn session_reports_dialect() {
        assert_eq!(ParseSession::new("", Some("text/less")).dialect(), Dialect::Less);
        assert_eq!(ParseSession::new("", Some("text/plain")).dialect(), Dialect::Css);
    }

    #[test]
    fn empty_input() {
        let result = parse_source("", None);
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.tokens.len(), 1);
        assert_eq!(result.tokens[0].kind(), TokenKind::Eof);
        assert_eq!(result.tree.root().span().len(), 0);
    }

    #[test]
    fn diagnostics_are_sorted_by_start() {
        let result = parse_source("a { color: ; } % b { x: ; }", None);
        assert!(result.diagnostics.len() >= 3, "{:?}", result.diagnostics);
        assert!(
            result
                .diagnostics
                .windows(2)
                .all(|pair| pair[0].start() <= pair[1].start())
        );
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| d.category == DiagnosticCategory::Lexing)
        );
    }

    #[test]
    fn parse_tokens_replays_a_recorded_stream() {
        let first = parse_source("a { b: c }", None);
        let replayed =
            ParseSession::new("a { b: c }", None).parse_tokens(first.tokens.clone(), &CssGrammar);
        assert_eq!(replayed.tree.dump(), first.tree.dump());
        assert_eq!(replayed.tokens, first.tokens);
    }

    #[test]
    fn nesting_limit_is_reported() {
        let source = "a { b { c { d { e: f } } } }";
        let options = SessionOptions::new()
            .with_dialect(Dialect::Less)
            .with_max_nesting_depth(10);
        let result = ParseSession::with_options(source, options).parse();
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| d.category == DiagnosticCategory::NestingLimit),
            "{:?}",
            result.diagnostics
        );
        let unlimited = ParseSession::with_options(source, options.with_max_nesting_depth(256));
        assert!(!unlimited.parse().has_errors());
    }

    #[test]
    fn result_owns_tree_and_source() {
        let result = ParseSession::new(String::from("a{}"), None).parse();
        assert_eq!(result.source(), "a{}");
        assert_eq!(result.tree.root().kind(), NodeKind::Root);
    }
}
