// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! `cascade check`: parse stylesheets and report every diagnostic.
//!
//! Exits non-zero if any file has an error.

use camino::Utf8Path;
use cascade_core::source_analysis::{Diagnostic, Dialect};
use cascade_core::{ParseResult, ParseSession, SessionOptions};
use miette::{IntoDiagnostic, Result};
use tracing::{debug, info};

use super::OutputFormat;
use crate::diagnostic::{CheckDiagnostic, JsonDiagnostic};
use crate::paths::{SourceFile, collect_sources};

/// Checks the file or directory at `path`.
pub fn run(path: &Utf8Path, dialect: Option<Dialect>, format: OutputFormat) -> Result<()> {
    let files = collect_sources(path)?;
    let mut error_count = 0usize;

    for file in &files {
        let source = SourceFile::load(file, dialect)?;
        let result = parse(&source);
        debug!(
            file = %source.path,
            dialect = %source.dialect,
            diagnostics = result.diagnostics.len(),
            "checked"
        );
        error_count += result.diagnostics.iter().filter(|d| d.is_error()).count();
        report(&source, &result.diagnostics, format)?;
    }

    info!(files = files.len(), errors = error_count, "check finished");
    if error_count > 0 {
        let plural = if error_count == 1 { "" } else { "s" };
        miette::bail!("{error_count} error{plural} found in {} file(s)", files.len());
    }
    Ok(())
}

pub(crate) fn parse(source: &SourceFile) -> ParseResult {
    let options = SessionOptions::new().with_dialect(source.dialect);
    ParseSession::with_options(source.text.as_str(), options).parse()
}

/// Prints diagnostics: miette reports on stderr, or JSON lines on stdout.
pub(crate) fn report(
    source: &SourceFile,
    diagnostics: &[Diagnostic],
    format: OutputFormat,
) -> Result<()> {
    for diagnostic in diagnostics {
        match format {
            OutputFormat::Text => {
                let report = CheckDiagnostic::from_core_diagnostic(
                    diagnostic,
                    source.path.as_str(),
                    &source.text,
                );
                eprintln!("{:?}", miette::Report::new(report));
            }
            OutputFormat::Json => {
                let line = serde_json::to_string(&JsonDiagnostic::new(
                    diagnostic,
                    source.path.as_str(),
                ))
                .into_diagnostic()?;
                println!("{line}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, text: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn clean_file_passes() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "ok.css", "a { color: red; }");
        assert!(run(&path, None, OutputFormat::Json).is_ok());
    }

    #[test]
    fn errors_fail_the_check() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.css", "a { color: ; }");
        let err = run(&path, None, OutputFormat::Json).unwrap_err();
        assert_eq!(err.to_string(), "1 error found in 1 file(s)");
    }

    #[test]
    fn dialect_follows_extension_unless_overridden() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "vars.less", "@x: 1px;");
        assert!(run(&path, None, OutputFormat::Json).is_ok());
        assert!(run(&path, Some(Dialect::Css), OutputFormat::Json).is_err());
    }
}
