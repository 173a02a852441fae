// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Problems found while tokenizing and parsing.

use std::fmt;

use ecow::EcoString;

use super::{LexError, RecognitionError, Span};

/// What kind of recognition failure produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// Input that matched no lexical rule.
    Lexing,
    /// A required token was not found.
    Mismatch,
    /// No alternative of a grammar rule could start here.
    NoViableAlternative,
    /// A construct is not available in the session's dialect.
    FailedPredicate,
    /// Nesting exceeded the configured depth.
    NestingLimit,
}

impl DiagnosticCategory {
    /// Stable lower-case name, used in machine-readable output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lexing => "lexing",
            Self::Mismatch => "mismatch",
            Self::NoViableAlternative => "no-viable-alternative",
            Self::FailedPredicate => "failed-predicate",
            Self::NestingLimit => "nesting-limit",
        }
    }
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// The source is not valid in the session's dialect.
    Error,
    /// Suspicious but accepted input.
    Warning,
}

/// A diagnostic message with its source location.
///
/// Spans always refer to the original source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// The failure category.
    pub category: DiagnosticCategory,
    /// The message shown to the user.
    pub message: EcoString,
    /// The source location.
    pub span: Span,
    /// Optional hint for how to fix the issue.
    pub hint: Option<EcoString>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(category: DiagnosticCategory, message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            category,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(
        category: DiagnosticCategory,
        message: impl Into<EcoString>,
        span: Span,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(category, message, span)
        }
    }

    /// Attaches a hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<EcoString>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Start offset in the original source.
    #[must_use]
    pub const fn start(&self) -> u32 {
        self.span.start()
    }

    /// End offset (exclusive) in the original source.
    #[must_use]
    pub const fn end(&self) -> u32 {
        self.span.end()
    }

    /// True for [`Severity::Error`].
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl From<&LexError> for Diagnostic {
    fn from(err: &LexError) -> Self {
        Self::error(DiagnosticCategory::Lexing, err.to_string(), err.span)
    }
}

impl From<&RecognitionError> for Diagnostic {
    fn from(err: &RecognitionError) -> Self {
        let diagnostic = match err {
            RecognitionError::Mismatch { .. } => {
                Self::error(DiagnosticCategory::Mismatch, err.to_string(), err.span())
            }
            RecognitionError::NoViableAlternative { .. } => Self::error(
                DiagnosticCategory::NoViableAlternative,
                err.to_string(),
                err.span(),
            ),
            RecognitionError::FailedPredicate { .. } => Self::error(
                DiagnosticCategory::FailedPredicate,
                err.to_string(),
                err.span(),
            ),
            RecognitionError::NestingTooDeep { .. } => {
                Self::error(DiagnosticCategory::NestingLimit, err.to_string(), err.span())
            }
        };
        if err.token().kind().is_eof() {
            diagnostic.with_hint("the stylesheet ends before this construct is complete")
        } else {
            diagnostic
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{LexErrorKind, Token, TokenKind, TokenSet};

    #[test]
    fn lexing_diagnostic_from_lex_error() {
        let err = LexError::new(LexErrorKind::UnexpectedCharacter('§'), Span::new(2, 4));
        let diagnostic = Diagnostic::from(&err);
        assert_eq!(diagnostic.category, DiagnosticCategory::Lexing);
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.message.as_str(), "unexpected character '§'");
        assert_eq!((diagnostic.start(), diagnostic.end()), (2, 4));
    }

    #[test]
    fn eof_mismatch_gets_hint() {
        let err = RecognitionError::Mismatch {
            expected: TokenSet::of(&[TokenKind::RBrace]),
            found: Token::new(TokenKind::Eof, Span::at(10), 1, 10),
        };
        let diagnostic = Diagnostic::from(&err);
        assert_eq!(diagnostic.category, DiagnosticCategory::Mismatch);
        assert!(diagnostic.hint.is_some());
    }

    #[test]
    fn warning_keeps_category() {
        let diagnostic = Diagnostic::warning(DiagnosticCategory::Lexing, "odd", Span::at(0));
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert!(!diagnostic.is_error());
        assert_eq!(diagnostic.category.to_string(), "lexing");
    }
}
