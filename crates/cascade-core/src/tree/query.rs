// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Path lookups such as `styleSheet/body/bodyItem|1/rule`.
//!
//! A path is a `/`-separated list of steps, each resolved among the
//! children of the previous match (starting below the node queried). A step
//! matches a child whose kind name equals the step, or a token child whose
//! image equals it. `name|n` picks the `n`-th (0-based) matching child
//! instead of the first.

use super::{Node, ParseTree};

struct Step<'p> {
    name: &'p str,
    index: usize,
}

fn parse_step(step: &str) -> Option<Step<'_>> {
    match step.rsplit_once('|') {
        Some((name, index)) if !name.is_empty() => Some(Step {
            name,
            index: index.parse().ok()?,
        }),
        _ => Some(Step {
            name: step,
            index: 0,
        }),
    }
}

impl<'t> Node<'t> {
    /// Follows `path` down from this node.
    ///
    /// Returns `None` if any step has no match or is malformed.
    #[must_use]
    pub fn query(self, path: &str) -> Option<Node<'t>> {
        path.split('/')
            .filter(|step| !step.is_empty())
            .try_fold(self, |node, step| {
                let step = parse_step(step)?;
                node.children()
                    .filter(|child| {
                        child.kind().name() == step.name
                            || (child.kind().is_token() && child.image() == step.name)
                    })
                    .nth(step.index)
            })
    }
}

impl ParseTree {
    /// Follows `path` down from the root. See [`Node::query`].
    ///
    /// ```
    /// use cascade_core::parse_source;
    ///
    /// let result = parse_source("a { color: red } b { }", None);
    /// let rule = result.tree.query("styleSheet/body/bodyItem|1/rule").expect("second rule");
    /// assert_eq!(rule.image(), "b { }");
    /// ```
    #[must_use]
    pub fn query(&self, path: &str) -> Option<Node<'_>> {
        self.root().query(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{Rule, Span, Token, TokenKind};
    use crate::tree::NodeKind;

    fn sample() -> ParseTree {
        let mut tree = ParseTree::new("a b");
        let root = tree.root().id();
        let body = tree.add_node(NodeKind::Rule(Rule::Body), Span::new(0, 3));
        let a = tree.add_token(&Token::new(TokenKind::Ident, Span::new(0, 1), 1, 0));
        let b = tree.add_token(&Token::new(TokenKind::Ident, Span::new(2, 3), 1, 2));
        tree.append_child(root, body);
        tree.append_child(body, a);
        tree.append_child(body, b);
        tree
    }

    #[test]
    fn matches_kind_names_and_indices() {
        let tree = sample();
        assert_eq!(tree.query("body").map(Node::image), Some("a b"));
        assert_eq!(tree.query("body/token").map(Node::image), Some("a"));
        assert_eq!(tree.query("body/token|1").map(Node::image), Some("b"));
        assert!(tree.query("body/token|2").is_none());
    }

    #[test]
    fn last_step_may_be_a_token_image() {
        let tree = sample();
        assert_eq!(tree.query("body/b").map(|n| n.span()), Some(Span::new(2, 3)));
    }

    #[test]
    fn malformed_or_missing_steps() {
        let tree = sample();
        assert!(tree.query("body/token|x").is_none());
        assert!(tree.query("rule").is_none());
        assert_eq!(tree.query("").map(|n| n.kind()), Some(NodeKind::Root));
    }
}
