// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Lexical rules for CSS, LESS and SCSS.
//!
//! All tests run against the upper-cased lookahead, so keywords such as
//! `@media`, `url(` and `!important` match in any case. Token text is never
//! read from the folded values.

use super::{LexRules, LexerContext};
use crate::source_analysis::{DialectPredicates, LexError, LexErrorKind, TokenKind};

/// The built-in lexical rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssLexRules;

impl LexRules for CssLexRules {
    fn match_token(&self, ctx: &mut LexerContext<'_>) -> Result<(), LexError> {
        let Some(c) = ctx.la(1) else {
            return Err(ctx.unexpected());
        };
        let next = ctx.la(2);

        match c {
            c if is_whitespace(c) => {
                ctx.consume_while(is_whitespace);
                ctx.set_hidden(TokenKind::Ws);
            }
            '/' if next == Some('*') => block_comment(ctx)?,
            '/' if next == Some('/') && ctx.is_preprocessor_source() => {
                ctx.consume_while(|c| c != '\n');
                ctx.set_hidden(TokenKind::LineComment);
            }
            '"' | '\'' => string(ctx, c)?,
            '#' if next == Some('{') && ctx.is_scss_source() => {
                ctx.consume_n(2);
                ctx.set_kind(TokenKind::ScssInterpolationStart);
            }
            '#' if starts_name_body(ctx, 2) => {
                ctx.consume();
                name_body(ctx);
                ctx.set_kind(TokenKind::Hash);
            }
            '@' if next == Some('{') && ctx.is_less_source() => {
                ctx.consume_n(2);
                ctx.set_kind(TokenKind::LessInterpolationStart);
            }
            '@' if starts_ident(ctx, 2) => at_keyword(ctx),
            '$' if next == Some('=') => single(ctx, TokenKind::EndsWith, 2),
            '$' if starts_ident(ctx, 2) => {
                ctx.consume();
                ident(ctx);
                ctx.set_kind(TokenKind::ScssVariable);
            }
            '!' => important(ctx)?,
            'U' if ctx.lookahead_is("URL(") => uri(ctx)?,
            '<' if ctx.lookahead_is("<!--") => single(ctx, TokenKind::Cdo, 4),
            '-' if ctx.lookahead_is("-->") => single(ctx, TokenKind::Cdc, 3),
            c if c.is_ascii_digit() => number(ctx),
            '.' if next.is_some_and(|c| c.is_ascii_digit()) => number(ctx),
            _ if starts_ident(ctx, 1) => {
                ident(ctx);
                ctx.set_kind(TokenKind::Ident);
            }
            '~' if next == Some('=') => single(ctx, TokenKind::Includes, 2),
            '|' if next == Some('=') => single(ctx, TokenKind::DashMatch, 2),
            '^' if next == Some('=') => single(ctx, TokenKind::BeginsWith, 2),
            '*' if next == Some('=') => single(ctx, TokenKind::Contains, 2),
            _ => {
                let Some(kind) = punctuation(c) else {
                    return Err(ctx.unexpected());
                };
                single(ctx, kind, 1);
            }
        }
        Ok(())
    }
}

fn punctuation(c: char) -> Option<TokenKind> {
    Some(match c {
        '{' => TokenKind::LBrace,
        '}' => TokenKind::RBrace,
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '[' => TokenKind::LBracket,
        ']' => TokenKind::RBracket,
        ':' => TokenKind::Colon,
        ';' => TokenKind::Semi,
        ',' => TokenKind::Comma,
        '.' => TokenKind::Dot,
        '>' => TokenKind::Greater,
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '~' => TokenKind::Tilde,
        '*' => TokenKind::Star,
        '/' => TokenKind::Solidus,
        '|' => TokenKind::Pipe,
        '=' => TokenKind::Equals,
        '&' => TokenKind::Ampersand,
        _ => return None,
    })
}

fn single(ctx: &mut LexerContext<'_>, kind: TokenKind, len: usize) {
    ctx.consume_n(len);
    ctx.set_kind(kind);
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0C')
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

/// An escape is a backslash followed by anything but a newline.
fn starts_escape(ctx: &LexerContext<'_>, at: isize) -> bool {
    ctx.la(at) == Some('\\') && ctx.la(at + 1).is_some_and(|c| c != '\n')
}

fn starts_name_body(ctx: &LexerContext<'_>, at: isize) -> bool {
    ctx.la(at).is_some_and(is_name_char) || starts_escape(ctx, at)
}

/// `-`? (name-start | escape), or the custom-property prefix `--`.
fn starts_ident(ctx: &LexerContext<'_>, at: isize) -> bool {
    let starts_name = |at| ctx.la(at).is_some_and(is_name_start) || starts_escape(ctx, at);
    match ctx.la(at) {
        Some('-') => ctx.la(at + 1) == Some('-') || starts_name(at + 1),
        _ => starts_name(at),
    }
}

fn escape(ctx: &mut LexerContext<'_>) {
    ctx.consume();
    if ctx.la(1).is_some_and(|c| c.is_ascii_hexdigit()) {
        let mut digits = 0;
        while digits < 6 && ctx.la(1).is_some_and(|c| c.is_ascii_hexdigit()) {
            ctx.consume();
            digits += 1;
        }
        if ctx.la(1).is_some_and(is_whitespace) {
            ctx.consume();
        }
    } else {
        ctx.consume();
    }
}

fn name_body(ctx: &mut LexerContext<'_>) {
    loop {
        if ctx.la(1).is_some_and(is_name_char) {
            ctx.consume();
        } else if starts_escape(ctx, 1) {
            escape(ctx);
        } else {
            return;
        }
    }
}

fn ident(ctx: &mut LexerContext<'_>) {
    if ctx.la(1) == Some('-') {
        ctx.consume();
    }
    name_body(ctx);
}

fn at_keyword(ctx: &mut LexerContext<'_>) {
    ctx.consume();
    ident(ctx);
    let name = ctx.text().get(1..).unwrap_or_default();
    let kind = if name.eq_ignore_ascii_case("import") {
        TokenKind::ImportSym
    } else if name.eq_ignore_ascii_case("media") {
        TokenKind::MediaSym
    } else if name.eq_ignore_ascii_case("charset") {
        TokenKind::CharsetSym
    } else if name.eq_ignore_ascii_case("namespace") {
        TokenKind::NamespaceSym
    } else {
        TokenKind::AtIdent
    };
    ctx.set_kind(kind);
}

fn block_comment(ctx: &mut LexerContext<'_>) -> Result<(), LexError> {
    ctx.consume_n(2);
    loop {
        match ctx.la(1) {
            None => return Err(ctx.error(LexErrorKind::UnterminatedComment)),
            Some('*') if ctx.la(2) == Some('/') => {
                ctx.consume_n(2);
                ctx.set_hidden(TokenKind::Comment);
                return Ok(());
            }
            Some(_) => ctx.consume(),
        }
    }
}

/// Quoted string. A raw newline or end of input before the closing quote
/// fails the token; the failed span runs up to that point.
fn string(ctx: &mut LexerContext<'_>, quote: char) -> Result<(), LexError> {
    ctx.consume();
    loop {
        match ctx.la(1) {
            None | Some('\n' | '\r' | '\x0C') => {
                return Err(ctx.error(LexErrorKind::UnterminatedString));
            }
            Some('\\') => {
                ctx.consume();
                ctx.consume();
            }
            Some(c) if c == quote => {
                ctx.consume();
                ctx.set_kind(TokenKind::String);
                return Ok(());
            }
            Some(_) => ctx.consume(),
        }
    }
}

/// `url(` ws* (string | url-chars*) ws* `)`
fn uri(ctx: &mut LexerContext<'_>) -> Result<(), LexError> {
    ctx.consume_n(4);
    ctx.consume_while(is_whitespace);
    match ctx.la(1) {
        Some(quote @ ('"' | '\'')) => string(ctx, quote)?,
        _ => ctx.consume_while(|c| !matches!(c, ')' | '(' | '"' | '\'') && !is_whitespace(c)),
    }
    ctx.consume_while(is_whitespace);
    ctx.match_str(")")?;
    ctx.set_kind(TokenKind::Uri);
    Ok(())
}

/// `!` ws* `important`. A lone `!` is left for the front-end to reject.
fn important(ctx: &mut LexerContext<'_>) -> Result<(), LexError> {
    let mut at = 2;
    while ctx.la(at).is_some_and(is_whitespace) {
        at += 1;
    }
    if !ctx.lookahead_is_at(at, "IMPORTANT") {
        return Err(ctx.unexpected());
    }
    ctx.consume();
    ctx.consume_while(is_whitespace);
    ctx.match_str("IMPORTANT")?;
    ctx.set_kind(TokenKind::ImportantSym);
    Ok(())
}

/// digits (`.` digits)? followed by `%` or a unit identifier.
fn number(ctx: &mut LexerContext<'_>) {
    ctx.consume_while(|c| c.is_ascii_digit());
    if ctx.la(1) == Some('.') && ctx.la(2).is_some_and(|c| c.is_ascii_digit()) {
        ctx.consume();
        ctx.consume_while(|c| c.is_ascii_digit());
    }
    if ctx.la(1) == Some('%') {
        ctx.consume();
        ctx.set_kind(TokenKind::Percentage);
    } else if starts_ident(ctx, 1) {
        ident(ctx);
        ctx.set_kind(TokenKind::Dimension);
    } else {
        ctx.set_kind(TokenKind::Number);
    }
}
