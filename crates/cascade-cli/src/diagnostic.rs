// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Diagnostic rendering for the terminal and for JSON consumers.
//!
//! Converts cascade-core diagnostics into miette reports with:
//! - Source context around the failing span
//! - The failure category in the label
//! - The hint, when the parser attached one

// Suppress unused_assignments for struct fields used by derive macros
#![allow(unused_assignments)]

use cascade_core::source_analysis::{Diagnostic as CoreDiagnostic, Severity};
use miette::{Diagnostic, SourceSpan};
use serde::Serialize;

/// A stylesheet diagnostic with rich formatting.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic(code(cascade::check))]
pub struct CheckDiagnostic {
    pub severity: Severity,
    pub message: String,
    #[source_code]
    pub src: miette::NamedSource<String>,
    #[label("{label}")]
    pub span: SourceSpan,
    /// Label for the error span (interpolated by miette derive macro)
    pub label: String,
    #[help]
    pub help: Option<String>,
}

impl CheckDiagnostic {
    /// Create a new diagnostic from a cascade-core diagnostic.
    pub fn from_core_diagnostic(
        diagnostic: &CoreDiagnostic,
        source_path: &str,
        source: &str,
    ) -> Self {
        let label = match diagnostic.severity {
            Severity::Error => format!("{} error here", diagnostic.category),
            Severity::Warning => format!("{} warning here", diagnostic.category),
        };

        Self {
            severity: diagnostic.severity,
            message: diagnostic.message.to_string(),
            src: miette::NamedSource::new(source_path, source.to_string()),
            span: (
                diagnostic.span.start() as usize,
                diagnostic.span.len() as usize,
            )
                .into(),
            label,
            help: diagnostic.hint.as_ref().map(ToString::to_string),
        }
    }
}

/// One diagnostic as a JSON line.
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic<'a> {
    pub file: &'a str,
    pub severity: &'static str,
    pub category: &'static str,
    pub message: &'a str,
    pub span_start: u32,
    pub span_end: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'a str>,
}

impl<'a> JsonDiagnostic<'a> {
    pub fn new(diagnostic: &'a CoreDiagnostic, file: &'a str) -> Self {
        Self {
            file,
            severity: match diagnostic.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            },
            category: diagnostic.category.as_str(),
            message: diagnostic.message.as_str(),
            span_start: diagnostic.start(),
            span_end: diagnostic.end(),
            hint: diagnostic.hint.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::source_analysis::{DiagnosticCategory, Span};

    #[test]
    fn test_from_core_diagnostic_error() {
        let core_diag =
            CoreDiagnostic::error(DiagnosticCategory::Mismatch, "expected '}'", Span::new(10, 15));
        let source = "a { color: red";
        let diag = CheckDiagnostic::from_core_diagnostic(&core_diag, "test.css", source);

        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "expected '}'");
        assert_eq!(diag.span.offset(), 10);
        assert_eq!(diag.span.len(), 5);
        assert_eq!(diag.label, "mismatch error here");
        assert!(diag.help.is_none());
    }

    #[test]
    fn test_from_core_diagnostic_warning_with_hint() {
        let core_diag = CoreDiagnostic::warning(DiagnosticCategory::Lexing, "odd", Span::new(5, 8))
            .with_hint("remove it");
        let diag = CheckDiagnostic::from_core_diagnostic(&core_diag, "test.css", "0123456789");

        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.label, "lexing warning here");
        assert_eq!(diag.help.as_deref(), Some("remove it"));
    }

    #[test]
    fn test_from_core_diagnostic_zero_length_span() {
        let core_diag =
            CoreDiagnostic::error(DiagnosticCategory::Mismatch, "unexpected end", Span::at(10));
        let diag = CheckDiagnostic::from_core_diagnostic(&core_diag, "test.css", "a { b: c  ");

        assert_eq!(diag.span.offset(), 10);
        assert_eq!(diag.span.len(), 0);
    }

    #[test]
    fn json_diagnostic_fields() {
        let core_diag = CoreDiagnostic::error(
            DiagnosticCategory::FailedPredicate,
            "LESS variable only allowed in LESS sources",
            Span::new(0, 4),
        );
        let json = serde_json::to_value(JsonDiagnostic::new(&core_diag, "a.css")).unwrap();
        assert_eq!(json["file"], "a.css");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["category"], "failed-predicate");
        assert_eq!(json["span_end"], 4);
        assert!(json.get("hint").is_none());
    }
}
