// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Selector grammar.
//!
//! ```text
//! selectorsGroup         → selector (',' selector)*
//! selector               → simpleSelectorSequence (combinator? simpleSelectorSequence)*
//! simpleSelectorSequence → typeSelector elementSubsequent* | elementSubsequent+
//! typeSelector           → namespacePrefix? elementName
//! elementSubsequent      → cssId | cssClass | slAttribute | pseudo | '&'
//! ```
//!
//! The descendant combinator is whitespace, so it has no node of its own:
//! two sequences separated only by hidden tokens are siblings inside the
//! same `selector`.

use super::{Parser, Rule, RuleResult};
use crate::source_analysis::{DialectPredicates, TokenKind, TokenSet};

const COMBINATORS: TokenSet = TokenSet::of(&[TokenKind::Greater, TokenKind::Plus, TokenKind::Tilde]);

const TYPE_SELECTOR_START: TokenSet =
    TokenSet::of(&[TokenKind::Ident, TokenKind::Star, TokenKind::Pipe]);

const SUBSEQUENT_START: TokenSet = TokenSet::of(&[
    TokenKind::Hash,
    TokenKind::Dot,
    TokenKind::LBracket,
    TokenKind::Colon,
    TokenKind::Ampersand,
]);

const ATTRIBUTE_OPERATORS: TokenSet = TokenSet::of(&[
    TokenKind::Equals,
    TokenKind::Includes,
    TokenKind::DashMatch,
    TokenKind::BeginsWith,
    TokenKind::EndsWith,
    TokenKind::Contains,
]);

const ATTRIBUTE_VALUES: TokenSet = TokenSet::of(&[TokenKind::Ident, TokenKind::String]);

/// Tokens that abandon an unbalanced pseudo-class argument list.
const PSEUDO_ARGUMENT_STOP: TokenSet = TokenSet::of(&[
    TokenKind::LBrace,
    TokenKind::RBrace,
    TokenKind::Semi,
    TokenKind::Eof,
]);

/// True if `kind` can start a selector.
pub(super) fn starts_selector(kind: TokenKind) -> bool {
    TYPE_SELECTOR_START.contains(kind) || SUBSEQUENT_START.contains(kind)
}

pub(super) fn selectors_group(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::SelectorsGroup, |p| {
        selector(p)?;
        while p.at(TokenKind::Comma) {
            p.consume();
            selector(p)?;
        }
        Ok(())
    })
}

fn selector(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::Selector, |p| {
        simple_selector_sequence(p)?;
        loop {
            if p.at_any(COMBINATORS) {
                p.token_rule(Rule::Combinator)?;
                simple_selector_sequence(p)?;
            } else if starts_selector(p.la(1)) {
                simple_selector_sequence(p)?;
            } else {
                return Ok(());
            }
        }
    })
}

fn simple_selector_sequence(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::SimpleSelectorSequence, |p| {
        let mut matched = false;
        if p.at_any(TYPE_SELECTOR_START) {
            type_selector(p)?;
            matched = true;
        }
        // Whitespace ends the sequence: `a .b` is two sequences.
        while p.at_any(SUBSEQUENT_START) && !(matched && p.preceded_by_hidden()) {
            element_subsequent(p)?;
            matched = true;
        }
        if matched {
            Ok(())
        } else {
            Err(p.no_viable_alternative("selector"))
        }
    })
}

fn type_selector(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::TypeSelector, |p| {
        let prefixed = p.at(TokenKind::Pipe)
            || (p.at_any(TokenSet::of(&[TokenKind::Ident, TokenKind::Star]))
                && p.la(2) == TokenKind::Pipe);
        if prefixed {
            p.rule(Rule::NamespacePrefix, |p| {
                if !p.at(TokenKind::Pipe) {
                    p.consume();
                }
                p.expect(TokenKind::Pipe)?;
                Ok(())
            })?;
        }
        p.rule(Rule::ElementName, |p| {
            p.expect_any(TokenSet::of(&[TokenKind::Ident, TokenKind::Star]))?;
            Ok(())
        })
    })
}

fn element_subsequent(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::ElementSubsequent, |p| match p.la(1) {
        TokenKind::Hash => p.token_rule(Rule::CssId).map(drop),
        TokenKind::Dot => p.rule(Rule::CssClass, |p| {
            p.consume();
            p.expect(TokenKind::Ident)?;
            Ok(())
        }),
        TokenKind::LBracket => attribute(p),
        TokenKind::Colon => pseudo(p),
        TokenKind::Ampersand if p.is_preprocessor_source() => {
            p.consume();
            Ok(())
        }
        TokenKind::Ampersand => Err(p.failed_predicate(
            "parent selector reference",
            "in LESS or SCSS sources",
        )),
        _ => Err(p.no_viable_alternative("selector")),
    })
}

/// `'[' IDENT (op (IDENT | STRING))? ']'`
fn attribute(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::SlAttribute, |p| {
        p.expect(TokenKind::LBracket)?;
        p.expect(TokenKind::Ident)?;
        if p.at_any(ATTRIBUTE_OPERATORS) {
            p.consume();
            p.expect_any(ATTRIBUTE_VALUES)?;
        }
        p.expect(TokenKind::RBracket)?;
        Ok(())
    })
}

/// `':' ':'? (IDENT | IDENT '(' arguments ')')`
///
/// Arguments (`:not(.a)`, `:nth-child(2n + 1)`) are matched as balanced
/// token runs.
fn pseudo(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::Pseudo, |p| {
        p.expect(TokenKind::Colon)?;
        if p.at(TokenKind::Colon) {
            p.consume();
        }
        p.expect(TokenKind::Ident)?;
        if p.at(TokenKind::LParen) && !p.preceded_by_hidden() {
            p.consume();
            let mut depth = 0usize;
            while !p.at_any(PSEUDO_ARGUMENT_STOP) {
                match p.la(1) {
                    TokenKind::LParen => depth += 1,
                    TokenKind::RParen if depth == 0 => break,
                    TokenKind::RParen => depth -= 1,
                    _ => {}
                }
                p.consume();
            }
            p.expect(TokenKind::RParen)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_starts() {
        for kind in [
            TokenKind::Ident,
            TokenKind::Star,
            TokenKind::Hash,
            TokenKind::Dot,
            TokenKind::Colon,
            TokenKind::LBracket,
            TokenKind::Ampersand,
        ] {
            assert!(starts_selector(kind), "{kind:?}");
        }
        assert!(!starts_selector(TokenKind::LBrace));
        assert!(!starts_selector(TokenKind::Number));
    }
}
