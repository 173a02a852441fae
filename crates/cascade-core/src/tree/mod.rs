// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Parse trees.
//!
//! A [`ParseTree`] is an arena of nodes addressed by [`NodeId`]. Children
//! are ordered id lists and parents are plain back-references, so the tree
//! has no ownership cycles. All nodes share one source text; a node's
//! [`image`](Node::image) is always the original-case slice its span covers.
//!
//! Node kinds:
//!
//! - [`NodeKind::Root`]: exactly one, spanning the whole input
//! - [`NodeKind::Rule`]: a grammar rule that matched at least one token
//! - [`NodeKind::Token`]: a default-channel token the grammar matched
//! - [`NodeKind::Recovery`]: one resynchronization, holding an
//!   [`NodeKind::Error`] node with the tokens it skipped
//!
//! Trees are normally built by [`ParseTreeBuilder`] through a
//! [`ParseSession`](crate::ParseSession).

mod builder;
mod dump;
mod query;

use std::fmt;
use std::sync::Arc;

use crate::source_analysis::{Rule, Span, Token, TokenKind};

pub use builder::ParseTreeBuilder;

/// Index of a node in its [`ParseTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The tree root.
    Root,
    /// A grammar rule.
    Rule(Rule),
    /// A matched token.
    Token(TokenKind),
    /// Tokens skipped by one resynchronization.
    Error,
    /// Wrapper around one resynchronization.
    Recovery,
}

impl NodeKind {
    /// Name used in dumps and path queries: the rule name for rules,
    /// `token` for tokens, otherwise the lower-case kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Rule(rule) => rule.name(),
            Self::Token(_) => "token",
            Self::Error => "error",
            Self::Recovery => "recovery",
        }
    }

    /// True for token nodes.
    #[must_use]
    pub const fn is_token(self) -> bool {
        matches!(self, Self::Token(_))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    token: Option<Token>,
}

/// An arena-allocated parse tree over a shared source text.
#[derive(Debug, Clone)]
pub struct ParseTree {
    source: Arc<str>,
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl ParseTree {
    /// Creates a tree holding only a root node that spans all of `source`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "stylesheets over 4GB are not supported"
    )]
    #[must_use]
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        let source = source.into();
        let root = NodeData {
            kind: NodeKind::Root,
            span: Span::new(0, source.len() as u32),
            parent: None,
            children: Vec::new(),
            token: None,
        };
        Self {
            source,
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// The source text every node refers to.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The shared source text.
    #[must_use]
    pub fn shared_source(&self) -> Arc<str> {
        Arc::clone(&self.source)
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            id: self.root,
        }
    }

    /// The node with `id`, if it exists in this tree's arena.
    ///
    /// Detached nodes (removed with [`ParseTree::delete_child`]) are still
    /// returned but are no longer reachable from the root.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<Node<'_>> {
        (id.index() < self.nodes.len()).then_some(Node { tree: self, id })
    }

    /// Number of nodes in the arena, detached ones included.
    #[must_use]
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Allocates a detached node.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "node count is bounded by input size"
    )]
    pub fn add_node(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            span,
            parent: None,
            children: Vec::new(),
            token: None,
        });
        id
    }

    /// Allocates a detached token node.
    pub fn add_token(&mut self, token: &Token) -> NodeId {
        let id = self.add_node(NodeKind::Token(token.kind()), token.span());
        self.nodes[id.index()].token = Some(token.clone());
        id
    }

    /// Sets a node's parent pointer without touching any child list.
    ///
    /// This is the low-level half of [`ParseTree::append_child`]; callers
    /// that use it directly must keep child lists consistent themselves.
    /// Returns `false` if either id is not in the arena.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> bool {
        if parent.is_some_and(|p| p.index() >= self.nodes.len()) {
            return false;
        }
        match self.nodes.get_mut(child.index()) {
            Some(node) => {
                node.parent = parent;
                true
            }
            None => false,
        }
    }

    /// Appends `child` as the last child of `parent`, detaching it from any
    /// previous parent first. Returns `false` (and changes nothing) if
    /// either id is unknown, `child` is the root, or the edge would form a
    /// cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent.index() >= self.nodes.len()
            || child.index() >= self.nodes.len()
            || child == self.root
            || self.is_ancestor_or_self(child, parent)
        {
            return false;
        }
        if let Some(old_parent) = self.nodes[child.index()].parent {
            self.delete_child(old_parent, child);
        }
        self.nodes[parent.index()].children.push(child);
        self.set_parent(child, Some(parent))
    }

    /// Removes `child` from `parent`'s children and clears its parent.
    ///
    /// Returns `false` (and changes nothing) if `child` is not a child of
    /// `parent`.
    pub fn delete_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(data) = self.nodes.get_mut(parent.index()) else {
            return false;
        };
        let Some(position) = data.children.iter().position(|&c| c == child) else {
            return false;
        };
        data.children.remove(position);
        self.set_parent(child, None)
    }

    /// Replaces a node's span.
    pub(crate) fn set_span(&mut self, id: NodeId, span: Span) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.span = span;
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes[node.index()].parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

/// A borrowed handle to one node of a [`ParseTree`].
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t ParseTree,
    id: NodeId,
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} {:?}", self.kind(), self.span(), self.image())
    }
}

impl<'t> Node<'t> {
    /// The node's id.
    #[must_use]
    pub const fn id(self) -> NodeId {
        self.id
    }

    /// The tree this node belongs to.
    #[must_use]
    pub const fn tree(self) -> &'t ParseTree {
        self.tree
    }

    /// The node kind.
    #[must_use]
    pub fn kind(self) -> NodeKind {
        self.tree.data(self.id).kind
    }

    /// Byte range in the source.
    #[must_use]
    pub fn span(self) -> Span {
        self.tree.data(self.id).span
    }

    /// The original-case source text this node covers.
    #[must_use]
    pub fn image(self) -> &'t str {
        let data = self.tree.data(self.id);
        match &data.token {
            Some(token) => token.image(&self.tree.source),
            None => self.tree.source.get(data.span.as_range()).unwrap_or(""),
        }
    }

    /// The matched token, for token nodes.
    #[must_use]
    pub fn token(self) -> Option<&'t Token> {
        self.tree.data(self.id).token.as_ref()
    }

    /// The parent node; `None` for the root and for detached nodes.
    #[must_use]
    pub fn parent(self) -> Option<Node<'t>> {
        let tree = self.tree;
        tree.data(self.id).parent.map(|id| Node { tree, id })
    }

    /// The children, in source order. Empty for leaves.
    pub fn children(self) -> impl ExactSizeIterator<Item = Node<'t>> + 't {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .iter()
            .map(move |&id| Node { tree, id })
    }

    /// Number of children.
    #[must_use]
    pub fn child_count(self) -> usize {
        self.tree.data(self.id).children.len()
    }

    /// The `index`-th child.
    #[must_use]
    pub fn child(self, index: usize) -> Option<Node<'t>> {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .get(index)
            .map(|&id| Node { tree, id })
    }

    /// The first child of `kind`.
    #[must_use]
    pub fn child_of_kind(self, kind: NodeKind) -> Option<Node<'t>> {
        self.children().find(|c| c.kind() == kind)
    }

    /// This node and everything below it, in pre-order.
    pub fn descendants(self) -> impl Iterator<Item = Node<'t>> + 't {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            let tree = node.tree;
            stack.extend(
                tree.data(node.id)
                    .children
                    .iter()
                    .rev()
                    .map(|&id| Node { tree, id }),
            );
            Some(node)
        })
    }

    /// The deepest node whose span covers `offset`.
    #[must_use]
    pub fn node_at(self, offset: u32) -> Option<Node<'t>> {
        if !self.span().covers(offset) {
            return None;
        }
        let mut node = self;
        while let Some(child) = node.children().find(|c| c.span().covers(offset)) {
            node = child;
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_children() -> (ParseTree, NodeId, NodeId, NodeId) {
        let mut tree = ParseTree::new("a{b}");
        let root = tree.root().id();
        let rule = tree.add_node(NodeKind::Rule(Rule::Rule), Span::new(0, 4));
        let first = tree.add_node(NodeKind::Token(TokenKind::Ident), Span::new(0, 1));
        let second = tree.add_node(NodeKind::Token(TokenKind::LBrace), Span::new(1, 2));
        assert!(tree.append_child(root, rule));
        assert!(tree.append_child(rule, first));
        assert!(tree.append_child(rule, second));
        (tree, rule, first, second)
    }

    #[test]
    fn root_spans_whole_input() {
        let tree = ParseTree::new("a { }");
        assert_eq!(tree.root().span(), Span::new(0, 5));
        assert_eq!(tree.root().kind(), NodeKind::Root);
        assert!(tree.root().parent().is_none());
        assert_eq!(tree.root().children().len(), 0);
    }

    #[test]
    fn children_and_parents_agree() {
        let (tree, rule, first, _) = tree_with_children();
        let rule = tree.get(rule).expect("rule");
        assert_eq!(rule.child_count(), 2);
        let first = tree.get(first).expect("first");
        assert_eq!(first.parent(), Some(rule));
        assert_eq!(first.image(), "a");
        assert_eq!(rule.image(), "a{b}");
    }

    #[test]
    fn delete_child_detaches() {
        let (mut tree, rule, first, second) = tree_with_children();
        assert!(tree.delete_child(rule, first));
        assert!(!tree.delete_child(rule, first), "already removed");
        assert!(!tree.delete_child(second, rule), "not a child");
        let rule_node = tree.get(rule).expect("rule");
        assert_eq!(rule_node.children().map(Node::id).collect::<Vec<_>>(), vec![second]);
        assert!(tree.get(first).expect("first").parent().is_none());
    }

    #[test]
    fn append_child_moves_between_parents() {
        let (mut tree, rule, first, second) = tree_with_children();
        assert!(tree.append_child(second, first));
        assert_eq!(tree.get(rule).expect("rule").child_count(), 1);
        assert_eq!(
            tree.get(first).expect("first").parent().map(Node::id),
            Some(second)
        );
    }

    #[test]
    fn append_child_rejects_cycles_and_root() {
        let (mut tree, rule, first, _) = tree_with_children();
        let root = tree.root().id();
        assert!(!tree.append_child(first, rule));
        assert!(!tree.append_child(rule, rule));
        assert!(!tree.append_child(rule, root));
    }

    #[test]
    fn set_parent_checks_ids() {
        let (mut tree, rule, first, _) = tree_with_children();
        assert!(!tree.set_parent(NodeId(99), Some(rule)));
        assert!(!tree.set_parent(first, Some(NodeId(99))));
        assert!(tree.set_parent(first, Some(rule)));
    }

    #[test]
    fn descendants_are_pre_order() {
        let (tree, ..) = tree_with_children();
        let kinds: Vec<_> = tree.root().descendants().map(|n| n.kind().name()).collect();
        assert_eq!(kinds, vec!["root", "rule", "token", "token"]);
    }

    #[test]
    fn node_at_finds_deepest_cover() {
        let (tree, _, _, second) = tree_with_children();
        assert_eq!(tree.root().node_at(1).map(Node::id), Some(second));
        assert_eq!(tree.root().node_at(3).map(|n| n.kind().name()), Some("rule"));
        assert!(tree.root().node_at(9).is_none());
    }

    #[test]
    fn unknown_id_is_none() {
        let tree = ParseTree::new("");
        assert!(tree.get(NodeId(5)).is_none());
        assert_eq!(tree.arena_len(), 1);
    }
}
