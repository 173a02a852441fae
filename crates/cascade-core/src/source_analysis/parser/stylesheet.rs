// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Stylesheet structure: the top-level rule, bodies, qualified rules and
//! at-rules.
//!
//! ```text
//! styleSheet     → charSet? imports* namespaces* body
//! body           → (bodyItem | ';' | '<!--' | '-->')*
//! bodyItem       → rule | media | atRule | cpVariableDeclaration
//! rule           → selectorsGroup '{' declarations '}'
//! media          → '@media' mediaQueryList '{' body '}'
//! atRule         → AT_KEYWORD prelude (';' | '{' (declarations | body) '}')
//! ```

use super::declarations::{self, DECLARATION_END};
use super::selectors;
use super::{Grammar, Parser, Rule, RuleResult};
use crate::source_analysis::{DialectPredicates, TokenKind, TokenSet};

/// Where a failed body item resynchronizes.
const BODY_ITEM_FOLLOW: TokenSet = TokenSet::of(&[TokenKind::Semi, TokenKind::RBrace]);

/// Where a failed `@charset`, `@import` or `@namespace` resynchronizes.
const STATEMENT_FOLLOW: TokenSet = TokenSet::of(&[
    TokenKind::Semi,
    TokenKind::LBrace,
    TokenKind::RBrace,
    TokenKind::ImportSym,
    TokenKind::NamespaceSym,
]);

/// Where a broken selector list resynchronizes, so the declaration block
/// can still be parsed.
const SELECTORS_FOLLOW: TokenSet = TokenSet::of(&[TokenKind::LBrace, TokenKind::RBrace]);

/// Tokens that end the prelude of a generic at-rule.
const AT_RULE_PRELUDE_END: TokenSet = TokenSet::of(&[
    TokenKind::Semi,
    TokenKind::LBrace,
    TokenKind::RBrace,
    TokenKind::Eof,
]);

/// Tokens that end the prelude of an `@import`.
const IMPORT_END: TokenSet = TokenSet::of(&[TokenKind::Semi, TokenKind::Eof]);

/// The built-in CSS/LESS/SCSS grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssGrammar;

impl Grammar for CssGrammar {
    fn parse(&self, parser: &mut Parser<'_>) -> RuleResult {
        style_sheet(parser)
    }
}

fn style_sheet(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::StyleSheet, |p| {
        if p.at(TokenKind::CharsetSym) {
            let result = char_set(p);
            p.recover(result, STATEMENT_FOLLOW);
        }
        while p.at(TokenKind::ImportSym) {
            let result = imports(p);
            p.recover(result, STATEMENT_FOLLOW);
        }
        while p.at(TokenKind::NamespaceSym) {
            let result = namespaces(p);
            p.recover(result, STATEMENT_FOLLOW);
        }
        body(p, false)
    })
}

/// `@charset STRING ;`
fn char_set(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::CharSet, |p| {
        p.expect(TokenKind::CharsetSym)?;
        p.expect(TokenKind::String)?;
        p.expect(TokenKind::Semi)?;
        Ok(())
    })
}

/// `@import (STRING | URI) mediaQueryList? ;`
fn imports(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::Imports, |p| {
        p.expect(TokenKind::ImportSym)?;
        p.expect_any(TokenSet::of(&[TokenKind::String, TokenKind::Uri]))?;
        if !p.at_any(IMPORT_END) {
            media_query_list(p)?;
        }
        p.expect(TokenKind::Semi)?;
        Ok(())
    })
}

/// `@namespace IDENT? (STRING | URI) ;`
fn namespaces(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::Namespaces, |p| {
        p.expect(TokenKind::NamespaceSym)?;
        if p.at(TokenKind::Ident) {
            p.consume();
        }
        p.expect_any(TokenSet::of(&[TokenKind::String, TokenKind::Uri]))?;
        p.expect(TokenKind::Semi)?;
        Ok(())
    })
}

/// A list of body items. Nested bodies stop at `}`, the top-level body only
/// at end of input.
pub(super) fn body(p: &mut Parser<'_>, nested: bool) -> RuleResult {
    p.rule(Rule::Body, |p| {
        loop {
            match p.la(1) {
                TokenKind::Eof => break,
                TokenKind::RBrace if nested => break,
                TokenKind::Semi => {
                    p.consume();
                }
                TokenKind::Cdo | TokenKind::Cdc if !nested => {
                    p.consume();
                }
                _ => {
                    let before = p.position();
                    let result = body_item(p);
                    p.recover(result, BODY_ITEM_FOLLOW);
                    // A stray `}` is in the follow set but cannot start an
                    // item; skip it or the loop would spin.
                    if p.position() == before {
                        p.skip_one();
                    }
                }
            }
        }
        Ok(())
    })
}

fn body_item(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::BodyItem, |p| match p.la(1) {
        TokenKind::MediaSym => media(p),
        TokenKind::AtIdent if declarations::starts_less_variable(p) => {
            declarations::variable_declaration(p)
        }
        TokenKind::ScssVariable => declarations::variable_declaration(p),
        kind if kind.is_at_keyword() => at_rule(p),
        kind if selectors::starts_selector(kind) => rule(p),
        _ => Err(p.no_viable_alternative("stylesheet body")),
    })
}

/// `selectorsGroup '{' declarations '}'`
pub(super) fn rule(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::Rule, |p| {
        let result = selectors::selectors_group(p);
        p.recover(result, SELECTORS_FOLLOW);
        declaration_block(p)
    })
}

/// `'{' declarations '}'`
fn declaration_block(p: &mut Parser<'_>) -> RuleResult {
    p.expect(TokenKind::LBrace)?;
    declarations::declarations(p)?;
    p.expect(TokenKind::RBrace)?;
    Ok(())
}

/// `'@media' mediaQueryList '{' body '}'`
fn media(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::Media, |p| {
        p.expect(TokenKind::MediaSym)?;
        if !p.at(TokenKind::LBrace) {
            media_query_list(p)?;
        }
        p.expect(TokenKind::LBrace)?;
        body(p, true)?;
        p.expect(TokenKind::RBrace)?;
        Ok(())
    })
}

/// `mediaQuery (',' mediaQuery)*`
fn media_query_list(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::MediaQueryList, |p| {
        media_query(p)?;
        while p.at(TokenKind::Comma) {
            p.consume();
            media_query(p)?;
        }
        Ok(())
    })
}

/// `(IDENT | mediaExpression)+`; keywords such as `only`, `not` and `and`
/// are plain identifiers here.
fn media_query(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::MediaQuery, |p| {
        let mut matched = false;
        loop {
            match p.la(1) {
                TokenKind::Ident => {
                    p.consume();
                }
                TokenKind::LParen => media_expression(p)?,
                _ if matched => return Ok(()),
                _ => return Err(p.no_viable_alternative("media query")),
            }
            matched = true;
        }
    })
}

/// `'(' IDENT (':' expression)? ')'`
fn media_expression(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::MediaExpression, |p| {
        p.expect(TokenKind::LParen)?;
        p.expect(TokenKind::Ident)?;
        if p.at(TokenKind::Colon) {
            p.consume();
            declarations::expression(p)?;
        }
        p.expect(TokenKind::RParen)?;
        Ok(())
    })
}

/// Any other at-rule: the keyword, a free-form prelude, then `;` or a
/// block. Blocks whose first item ends in `{` hold a body (`@keyframes`,
/// `@supports`); all others hold declarations (`@font-face`, `@page`).
fn at_rule(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::AtRule, |p| {
        p.consume();
        while !p.at_any(AT_RULE_PRELUDE_END) {
            p.consume();
        }
        match p.la(1) {
            TokenKind::Semi => {
                p.consume();
                Ok(())
            }
            TokenKind::LBrace => {
                p.consume();
                let block_end = DECLARATION_END.with(TokenKind::LBrace);
                if p.first_of(block_end) == Some(TokenKind::LBrace) {
                    body(p, true)?;
                } else {
                    declarations::declarations(p)?;
                }
                p.expect(TokenKind::RBrace)?;
                Ok(())
            }
            _ => Err(p.mismatch(TokenSet::of(&[TokenKind::Semi, TokenKind::LBrace]))),
        }
    })
}

/// True when a LESS/SCSS declaration list item is a nested rule: its first
/// block-level delimiter is `{`.
pub(super) fn starts_nested_rule(p: &Parser<'_>) -> bool {
    p.is_preprocessor_source()
        && selectors::starts_selector(p.la(1))
        && p.first_of(DECLARATION_END.with(TokenKind::LBrace)) == Some(TokenKind::LBrace)
}
