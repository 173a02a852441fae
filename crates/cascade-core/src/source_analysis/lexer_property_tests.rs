// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the tokenizer.
//!
//! These tests use `proptest` to verify tokenizer invariants over generated
//! inputs:
//!
//! 1. **Tokenizer never panics** on arbitrary input, in every dialect
//! 2. **Coverage**: token spans tile the input from 0 to its length
//! 3. **EOF is always last** and sits at the input length
//! 4. **Determinism**: same input, same tokens
//! 5. **Valid fragments produce no invalid tokens**
//! 6. **Every invalid token has a lexing diagnostic**

use proptest::prelude::*;

use super::lexer::{Tokenizer, lex, lex_with_eof};
use super::{Dialect, DiagnosticCategory, TokenKind};

// ============================================================================
// Generators
// ============================================================================

/// Known-valid fragments that should tokenize without invalid tokens.
const VALID_FRAGMENTS: &[&str] = &[
    "a { color: red; }",
    "h1, h2 > p + ul ~ li { margin: 0 auto }",
    "#main .nav:hover { background: url(bg.png) no-repeat }",
    "a[href^=\"http\"] { content: 'x' !important }",
    "@media screen and (max-width: 600px) { p { font-size: 1.5em } }",
    "@import url(\"base.css\");",
    "@charset \"utf-8\";",
    "div { width: 50%; z-index: -1 }",
    "/* comment */ p { }",
    "<!-- a { } -->",
    "a { color: RGB(0, 0, 0) }",
];

fn valid_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_FRAGMENTS).prop_map(std::string::ToString::to_string)
}

fn dialect() -> impl Strategy<Value = Dialect> {
    prop::sample::select(&[Dialect::Css, Dialect::Less, Dialect::Scss][..])
}

/// Default is 512 cases; override via `PROPTEST_CASES` env var for nightly runs.
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: the tokenizer never panics on arbitrary input.
    #[test]
    fn tokenizer_never_panics(input in "\\PC{0,500}", dialect in dialect()) {
        let _tokens = lex_with_eof(&input, dialect);
    }

    /// Property 2: tokens are contiguous and cover the whole input.
    #[test]
    fn tokens_cover_input(input in "\\PC{0,300}", dialect in dialect()) {
        let tokens = lex(&input, dialect);
        let mut expected_start = 0;
        for token in &tokens {
            prop_assert_eq!(
                token.span().start(),
                expected_start,
                "gap or overlap before {:?} for input {:?}",
                token,
                input,
            );
            prop_assert!(
                !token.span().is_empty(),
                "zero-width {:?} for input {:?}",
                token,
                input,
            );
            expected_start = token.span().end();
        }
        let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        prop_assert_eq!(expected_start, input_len);
    }

    /// Property 2b: coverage also holds for CSS-shaped noise, where most
    /// rules are exercised.
    #[test]
    fn tokens_cover_css_like_input(
        input in "[a-zA-Z0-9 #.@$!:;,{}()\\[\\]'\"/*<>~|^=&%-]{0,200}",
        dialect in dialect(),
    ) {
        let tokens = lex(&input, dialect);
        let covered: u32 = tokens.iter().map(|t| t.span().len()).sum();
        prop_assert_eq!(covered as usize, input.len());
    }

    /// Property 3: `lex_with_eof` always ends with a zero-width EOF at the end.
    #[test]
    fn eof_always_last(input in "\\PC{0,300}") {
        let tokens = lex_with_eof(&input, Dialect::Css);
        let last = tokens.last();
        prop_assert!(last.is_some_and(|t| t.kind().is_eof()));
        let eof_tokens = tokens.iter().filter(|t| t.kind().is_eof()).count();
        prop_assert_eq!(eof_tokens, 1);
        if let Some(eof) = last {
            prop_assert_eq!(eof.span().start() as usize, input.len());
            prop_assert!(eof.span().is_empty());
        }
    }

    /// Property 4: same input, same tokens.
    #[test]
    fn tokenizer_deterministic(input in "\\PC{0,200}", dialect in dialect()) {
        prop_assert_eq!(lex_with_eof(&input, dialect), lex_with_eof(&input, dialect));
    }

    /// Property 5: known-valid fragments produce no invalid tokens.
    #[test]
    fn valid_fragments_no_invalid_tokens(input in valid_fragment(), dialect in dialect()) {
        for token in lex(&input, dialect) {
            prop_assert!(
                !token.kind().is_invalid(),
                "valid input {:?} produced {:?}",
                input,
                token,
            );
        }
    }

    /// Property 6: every invalid token has a matching lexing diagnostic.
    #[test]
    fn invalid_tokens_are_reported(input in "\\PC{0,200}", dialect in dialect()) {
        let mut tokenizer = Tokenizer::new(input.as_str(), dialect);
        let invalid: Vec<_> = tokenizer
            .by_ref()
            .filter(|t| t.kind() == TokenKind::Invalid)
            .map(|t| t.span())
            .collect();
        let reported: Vec<_> = tokenizer
            .diagnostics()
            .iter()
            .inspect(|d| assert_eq!(d.category, DiagnosticCategory::Lexing))
            .map(|d| d.span)
            .collect();
        prop_assert_eq!(invalid, reported);
    }
}
