// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Indented text rendering of a tree, one node per line.
//!
//! ```text
//! root [0..5]
//!   styleSheet [0..5]
//!     body [0..5]
//!       bodyItem [0..5]
//!         rule [0..5]
//!           selectorsGroup [0..1]
//!           ...
//!             token Ident "a" [0..1]
//! ```

use std::fmt::Write as _;

use super::{Node, ParseTree};

impl ParseTree {
    /// Renders the reachable tree for debugging and snapshot tests.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        dump_node(self.root(), 0, &mut out);
        out
    }
}

fn dump_node(node: Node<'_>, depth: usize, out: &mut String) {
    let span = node.span();
    let _ = write!(out, "{:indent$}{}", "", node.kind(), indent = depth * 2);
    if let Some(token) = node.token() {
        let _ = write!(out, " {:?} {:?}", token.kind(), node.image());
    }
    let _ = writeln!(out, " [{}..{}]", span.start(), span.end());
    for child in node.children() {
        dump_node(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{Span, Token, TokenKind};
    use crate::tree::NodeKind;

    #[test]
    fn renders_kinds_tokens_and_spans() {
        let mut tree = ParseTree::new("a;");
        let root = tree.root().id();
        let recovery = tree.add_node(NodeKind::Recovery, Span::new(0, 1));
        let error = tree.add_node(NodeKind::Error, Span::new(0, 1));
        let token = tree.add_token(&Token::new(TokenKind::Ident, Span::new(0, 1), 1, 0));
        tree.append_child(root, recovery);
        tree.append_child(recovery, error);
        tree.append_child(error, token);
        assert_eq!(
            tree.dump(),
            "root [0..2]\n  recovery [0..1]\n    error [0..1]\n      token Ident \"a\" [0..1]\n"
        );
    }

    #[test]
    fn detached_nodes_are_not_rendered() {
        let mut tree = ParseTree::new("x");
        tree.add_node(NodeKind::Error, Span::new(0, 1));
        assert_eq!(tree.dump(), "root [0..1]\n");
    }
}
