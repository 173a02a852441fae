// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Builds a [`ParseTree`] from parser events.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::trace;

use super::{NodeId, NodeKind, ParseTree};
use crate::source_analysis::{Diagnostic, ParseEventSink, RecognitionError, Rule, Span, Token};

/// A [`ParseEventSink`] that assembles the parse tree and collects one
/// diagnostic per recognition failure.
///
/// - rule nodes open on `enter_rule` and close on `exit_rule`; a rule that
///   matched nothing is removed again
/// - each resynchronization becomes a `recovery` node wrapping an `error`
///   node with the skipped tokens; a resync that skipped nothing leaves no
///   trace
/// - failures reported twice at the same span produce one diagnostic
#[derive(Debug)]
pub struct ParseTreeBuilder {
    tree: ParseTree,
    /// Open nodes, innermost last. The root is never popped.
    open: Vec<NodeId>,
    /// The `(recovery, error)` pair of the resync in progress.
    resync: Option<(NodeId, NodeId)>,
    diagnostics: Vec<Diagnostic>,
    reported: HashSet<Span>,
}

impl ParseTreeBuilder {
    /// Creates a builder for a tree over `source`.
    #[must_use]
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        let tree = ParseTree::new(source);
        let root = tree.root().id();
        Self {
            tree,
            open: vec![root],
            resync: None,
            diagnostics: Vec::new(),
            reported: HashSet::new(),
        }
    }

    /// Diagnostics collected so far, in report order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns the finished tree and the collected diagnostics.
    #[must_use]
    pub fn finish(self) -> (ParseTree, Vec<Diagnostic>) {
        (self.tree, self.diagnostics)
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(self.tree.root)
    }

    /// Span from the first child's start to the last child's end.
    fn children_span(&self, id: NodeId) -> Option<Span> {
        let children = &self.tree.data(id).children;
        let first = children.first()?;
        let last = children.last()?;
        Some(self.tree.data(*first).span.merge(self.tree.data(*last).span))
    }

    /// Fixes `id`'s span from its children, or removes it from `parent`
    /// when it has none.
    fn close(&mut self, parent: NodeId, id: NodeId) {
        match self.children_span(id) {
            Some(span) => self.tree.set_span(id, span),
            None => {
                self.tree.delete_child(parent, id);
            }
        }
    }
}

impl ParseEventSink for ParseTreeBuilder {
    fn enter_rule(&mut self, rule: Rule) {
        let start = self.tree.root().span().end();
        let id = self.tree.add_node(NodeKind::Rule(rule), Span::at(start));
        self.tree.append_child(self.current(), id);
        self.open.push(id);
    }

    fn exit_rule(&mut self, rule: Rule) {
        if self.open.len() <= 1 {
            return;
        }
        let Some(id) = self.open.pop() else {
            return;
        };
        debug_assert_eq!(self.tree.data(id).kind, NodeKind::Rule(rule));
        let parent = self.current();
        self.close(parent, id);
    }

    fn consume_token(&mut self, token: &Token) {
        if token.is_hidden() {
            return;
        }
        let id = self.tree.add_token(token);
        self.tree.append_child(self.current(), id);
    }

    fn recognition_error(&mut self, error: &RecognitionError) {
        if self.reported.insert(error.span()) {
            self.diagnostics.push(Diagnostic::from(error));
        } else {
            trace!(error = %error, "duplicate recognition error dropped");
        }
    }

    fn begin_resync(&mut self) {
        let at = Span::at(self.tree.root().span().end());
        let recovery = self.tree.add_node(NodeKind::Recovery, at);
        let error = self.tree.add_node(NodeKind::Error, at);
        self.tree.append_child(self.current(), recovery);
        self.tree.append_child(recovery, error);
        self.resync = Some((recovery, error));
    }

    fn consume_skipped_tokens(&mut self, tokens: &[Token]) {
        let Some((_, error)) = self.resync else {
            return;
        };
        for token in tokens.iter().filter(|t| !t.is_hidden()) {
            let id = self.tree.add_token(token);
            self.tree.append_child(error, id);
        }
    }

    fn end_resync(&mut self) {
        let Some((recovery, error)) = self.resync.take() else {
            return;
        };
        self.close(recovery, error);
        let parent = self.current();
        self.close(parent, recovery);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{
        CssGrammar, Dialect, Parser, TokenKind, TokenStream, lex_with_eof,
    };
    use crate::tree::Node;

    fn build(source: &str) -> (ParseTree, Vec<Diagnostic>) {
        let mut builder = ParseTreeBuilder::new(source);
        let stream = TokenStream::new(lex_with_eof(source, Dialect::Css));
        Parser::new(stream, Dialect::Css, &mut builder).run(&CssGrammar);
        builder.finish()
    }

    fn kinds_named(tree: &ParseTree, name: &str) -> usize {
        tree.root()
            .descendants()
            .filter(|n| n.kind().name() == name)
            .count()
    }

    #[test]
    fn rule_spans_come_from_children() {
        let (tree, diagnostics) = build("  a { color: red }  ");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let rule = tree
            .root()
            .descendants()
            .find(|n| n.kind() == NodeKind::Rule(Rule::Rule))
            .expect("rule");
        assert_eq!(rule.span(), Span::new(2, 18));
        assert_eq!(rule.image(), "a { color: red }");
    }

    #[test]
    fn hidden_tokens_are_not_nodes() {
        let (tree, _) = build("a /* c */ { }");
        assert!(
            tree.root()
                .descendants()
                .all(|n| n.token().is_none_or(|t| !t.is_hidden()))
        );
        assert!(
            tree.root()
                .descendants()
                .all(|n| n.kind() != NodeKind::Token(TokenKind::Comment))
        );
    }

    #[test]
    fn empty_rules_are_removed() {
        let (tree, _) = build("a { }");
        for node in tree.root().descendants() {
            if let NodeKind::Rule(_) = node.kind() {
                assert!(node.child_count() > 0, "empty {node:?}");
            }
        }
        assert_eq!(kinds_named(&tree, "declarations"), 0);
    }

    #[test]
    fn resync_that_skips_nothing_leaves_no_recovery_node() {
        let (tree, diagnostics) = build("h1 { color: ;}");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(kinds_named(&tree, "recovery"), 0);
        assert_eq!(kinds_named(&tree, "error"), 0);
    }

    #[test]
    fn skipped_tokens_land_in_error_node() {
        let source = "a { color: red ) ; }";
        let (tree, diagnostics) = build(source);
        assert!(!diagnostics.is_empty());
        let error = tree
            .root()
            .descendants()
            .find(|n| n.kind() == NodeKind::Error)
            .expect("error node");
        assert_eq!(error.parent().map(Node::kind), Some(NodeKind::Recovery));
        assert_eq!(error.image(), ")");
    }

    #[test]
    fn duplicate_errors_at_same_span_are_dropped() {
        let mut builder = ParseTreeBuilder::new("x");
        let found = Token::new(TokenKind::Ident, Span::new(0, 1), 1, 0);
        let error = RecognitionError::NoViableAlternative { rule: "test", found };
        builder.recognition_error(&error);
        builder.recognition_error(&error);
        assert_eq!(builder.diagnostics().len(), 1);
    }

    #[test]
    fn unbalanced_exit_never_pops_root() {
        let mut builder = ParseTreeBuilder::new("x");
        builder.exit_rule(Rule::Body);
        let token = Token::new(TokenKind::Ident, Span::new(0, 1), 1, 0);
        builder.consume_token(&token);
        let (tree, _) = builder.finish();
        assert_eq!(tree.root().child_count(), 1);
    }
}
