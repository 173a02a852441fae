// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! `cascade tokens`: print the token stream of one stylesheet.

use std::fmt::Write as _;

use camino::Utf8Path;
use cascade_core::source_analysis::{Dialect, Token, Tokenizer};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use super::OutputFormat;
use crate::paths::SourceFile;

/// One token as a JSON line.
#[derive(Debug, Serialize)]
struct JsonToken<'a> {
    kind: String,
    text: &'a str,
    start: u32,
    end: u32,
    line: u32,
    column: u32,
    hidden: bool,
}

/// Prints every token of the file at `path`, hidden ones included, then
/// any lexing diagnostics on stderr.
pub fn run(path: &Utf8Path, dialect: Option<Dialect>, format: OutputFormat) -> Result<()> {
    let source = SourceFile::load(path, dialect)?;
    let mut tokenizer = Tokenizer::new(source.text.as_str(), source.dialect);
    let mut tokens: Vec<Token> = tokenizer.by_ref().collect();
    tokens.push(tokenizer.next_token());

    print!("{}", render(&tokens, &source.text, format)?);

    super::check::report(&source, tokenizer.diagnostics(), OutputFormat::Text)
}

/// Renders tokens one per line.
fn render(tokens: &[Token], source: &str, format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    for token in tokens {
        let text = token.image(source);
        match format {
            OutputFormat::Text => {
                let hidden = if token.is_hidden() { " (hidden)" } else { "" };
                let _ = writeln!(
                    out,
                    "{}:{} {:?} {:?}{hidden}",
                    token.line(),
                    token.column(),
                    token.kind(),
                    text
                );
            }
            OutputFormat::Json => {
                let json = JsonToken {
                    kind: format!("{:?}", token.kind()),
                    text,
                    start: token.span().start(),
                    end: token.span().end(),
                    line: token.line(),
                    column: token.column(),
                    hidden: token.is_hidden(),
                };
                out.push_str(&serde_json::to_string(&json).into_diagnostic()?);
                out.push('\n');
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::source_analysis::lex_with_eof;

    #[test]
    fn text_rendering_marks_hidden_tokens() {
        let source = "a {}";
        let tokens = lex_with_eof(source, Dialect::Css);
        let out = render(&tokens, source, OutputFormat::Text).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "1:0 Ident \"a\"");
        assert_eq!(lines[1], "1:1 Ws \" \" (hidden)");
        assert_eq!(lines.len(), tokens.len());
    }

    #[test]
    fn json_rendering_is_one_object_per_token() {
        let source = "a{}";
        let tokens = lex_with_eof(source, Dialect::Css);
        let out = render(&tokens, source, OutputFormat::Json).unwrap();
        let first: serde_json::Value =
            serde_json::from_str(out.lines().next().unwrap()).unwrap();
        assert_eq!(first["kind"], "Ident");
        assert_eq!(first["text"], "a");
        assert_eq!(first["end"], 1);
        assert_eq!(first["hidden"], false);
        assert_eq!(out.lines().count(), 4);
    }
}
