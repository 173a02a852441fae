// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Declaration blocks and property values.
//!
//! ```text
//! declarations          → (declaration? ';')* declaration?
//! declaration           → propertyDeclaration | rule | cpVariableDeclaration
//! propertyDeclaration   → property ':' propertyValue prio?
//! propertyValue         → expression
//! expression            → term (operator? term)*
//! term                  → ('+' | '-')? NUMBER | PERCENTAGE | DIMENSION
//!                         | STRING | IDENT | URI | HASH | function
//!                         | cpVariable | interpolation
//! function              → IDENT '(' expression? ')'
//! cpVariableDeclaration → cpVariable ':' expression
//! ```
//!
//! Nested rules, variables and interpolation are LESS/SCSS constructs and
//! fail with a predicate error in plain CSS.

use super::stylesheet;
use super::{Parser, Rule, RuleResult};
use crate::source_analysis::{DialectPredicates, TokenKind, TokenSet};

/// Tokens that may follow a complete declaration.
pub(super) const DECLARATION_END: TokenSet =
    TokenSet::of(&[TokenKind::Semi, TokenKind::RBrace, TokenKind::Eof]);

/// Where a failed declaration resynchronizes.
const DECLARATION_FOLLOW: TokenSet = TokenSet::of(&[TokenKind::Semi, TokenKind::RBrace]);

const OPERATORS: TokenSet =
    TokenSet::of(&[TokenKind::Comma, TokenKind::Solidus, TokenKind::Equals]);

const NUMERIC: TokenSet = TokenSet::of(&[
    TokenKind::Number,
    TokenKind::Percentage,
    TokenKind::Dimension,
]);

const PLAIN_TERMS: TokenSet = TokenSet::of(&[
    TokenKind::Number,
    TokenKind::Percentage,
    TokenKind::Dimension,
    TokenKind::String,
    TokenKind::Uri,
    TokenKind::Hash,
]);

const TERM_START: TokenSet = PLAIN_TERMS.union(TokenSet::of(&[
    TokenKind::Ident,
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::AtIdent,
    TokenKind::ScssVariable,
    TokenKind::ScssInterpolationStart,
    TokenKind::LessInterpolationStart,
]));

const LESS_ONLY: &str = "in LESS sources";
const SCSS_ONLY: &str = "in SCSS sources";
const PREPROCESSOR_ONLY: &str = "in LESS or SCSS sources";

/// The contents of a `{ ... }` block, up to but excluding `}`.
pub(super) fn declarations(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::Declarations, |p| {
        loop {
            match p.la(1) {
                TokenKind::RBrace | TokenKind::Eof => return Ok(()),
                TokenKind::Semi => {
                    p.consume();
                }
                _ => {
                    // Resync always consumes the offending token unless it
                    // is `;` or `}`, which the arms above handle.
                    let result = declaration(p);
                    p.recover(result, DECLARATION_FOLLOW);
                }
            }
        }
    })
}

fn declaration(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::Declaration, |p| match p.la(1) {
        TokenKind::ScssVariable => variable_declaration(p),
        TokenKind::AtIdent if starts_less_variable(p) => variable_declaration(p),
        _ if stylesheet::starts_nested_rule(p) => stylesheet::rule(p),
        TokenKind::Ident => property_declaration(p),
        _ => Err(p.no_viable_alternative("declaration")),
    })
}

/// `property ':' propertyValue prio?`
fn property_declaration(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::PropertyDeclaration, |p| {
        p.token_rule(Rule::Property)?;
        p.expect(TokenKind::Colon)?;
        p.rule(Rule::PropertyValue, expression)?;
        if p.at(TokenKind::ImportantSym) {
            p.token_rule(Rule::Prio)?;
        }
        p.check_any(DECLARATION_END)
    })
}

/// `cpVariable ':' expression`, gated on the dialect that owns the
/// variable syntax.
pub(super) fn variable_declaration(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::CpVariableDeclaration, |p| {
        check_variable_dialect(p)?;
        p.token_rule(Rule::CpVariable)?;
        p.expect(TokenKind::Colon)?;
        expression(p)?;
        p.check_any(DECLARATION_END)
    })
}

/// True for `@name ':' ... ';'`. An at-keyword followed by a colon whose
/// first block-level delimiter is `{` is an at-rule such as `@page :first`.
pub(super) fn starts_less_variable(p: &Parser<'_>) -> bool {
    p.la(1) == TokenKind::AtIdent
        && p.la(2) == TokenKind::Colon
        && p.first_of(DECLARATION_END.with(TokenKind::LBrace)) != Some(TokenKind::LBrace)
}

fn check_variable_dialect(p: &Parser<'_>) -> RuleResult {
    match p.la(1) {
        TokenKind::ScssVariable if !p.is_scss_source() => {
            Err(p.failed_predicate("SCSS variable", SCSS_ONLY))
        }
        TokenKind::AtIdent if !p.is_less_source() => {
            Err(p.failed_predicate("LESS variable", LESS_ONLY))
        }
        _ => Ok(()),
    }
}

/// `term (operator? term)*`
pub(super) fn expression(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::Expression, |p| {
        term(p)?;
        loop {
            if p.at_any(OPERATORS) {
                p.token_rule(Rule::Operator)?;
                term(p)?;
            } else if p.at_any(TERM_START) {
                term(p)?;
            } else {
                return Ok(());
            }
        }
    })
}

fn term(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::Term, |p| match p.la(1) {
        TokenKind::Plus | TokenKind::Minus if NUMERIC.contains(p.la(2)) => {
            p.consume();
            p.consume();
            Ok(())
        }
        kind if PLAIN_TERMS.contains(kind) => {
            p.consume();
            Ok(())
        }
        TokenKind::Ident if p.la(2) == TokenKind::LParen => function(p),
        TokenKind::Ident => {
            p.consume();
            Ok(())
        }
        TokenKind::AtIdent | TokenKind::ScssVariable => {
            check_variable_dialect(p)?;
            p.token_rule(Rule::CpVariable).map(drop)
        }
        TokenKind::ScssInterpolationStart | TokenKind::LessInterpolationStart => interpolation(p),
        _ => Err(p.no_viable_alternative("property value")),
    })
}

/// `IDENT '(' expression? ')'`
fn function(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::Function, |p| {
        p.expect(TokenKind::Ident)?;
        p.expect(TokenKind::LParen)?;
        if !p.at(TokenKind::RParen) {
            expression(p)?;
        }
        p.expect(TokenKind::RParen)?;
        Ok(())
    })
}

/// `'#{' expression '}'` (SCSS) or `'@{' IDENT '}'` (LESS).
fn interpolation(p: &mut Parser<'_>) -> RuleResult {
    p.rule(Rule::Interpolation, |p| {
        if !p.is_preprocessor_source() {
            return Err(p.failed_predicate("interpolation", PREPROCESSOR_ONLY));
        }
        if p.at(TokenKind::LessInterpolationStart) {
            p.consume();
            p.expect(TokenKind::Ident)?;
        } else {
            p.expect(TokenKind::ScssInterpolationStart)?;
            expression(p)?;
        }
        p.expect(TokenKind::RBrace)?;
        Ok(())
    })
}
