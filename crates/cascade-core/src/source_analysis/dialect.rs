// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Stylesheet dialect selection.
//!
//! A parse session runs in exactly one [`Dialect`], chosen from the source's
//! media type when the session is created. The tokenizer and the parser each
//! hold their own copy; lexical rules and grammar rules consult it through
//! [`DialectPredicates`] to switch dialect-only constructs on or off (LESS
//! `@variables` and `@{interpolation}`, SCSS `$variables` and `#{...}`,
//! nested rules, `//` line comments).

use std::fmt;
use std::str::FromStr;

/// Media type of LESS sources.
pub const LESS_MIME_TYPE: &str = "text/less";
/// Media type of SCSS sources.
pub const SCSS_MIME_TYPE: &str = "text/scss";
/// Media type of plain CSS sources.
pub const CSS_MIME_TYPE: &str = "text/css";

/// The stylesheet language variant of a parse session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// Plain CSS.
    #[default]
    Css,
    /// LESS.
    Less,
    /// SCSS (Sass with CSS-like syntax).
    Scss,
}

impl Dialect {
    /// Picks a dialect from an optional media type.
    ///
    /// Absent or unrecognized media types fall back to [`Dialect::Css`].
    ///
    /// ```
    /// use cascade_core::source_analysis::Dialect;
    ///
    /// assert_eq!(Dialect::from_mime_type(Some("text/less")), Dialect::Less);
    /// assert_eq!(Dialect::from_mime_type(Some("text/x-unknown")), Dialect::Css);
    /// assert_eq!(Dialect::from_mime_type(None), Dialect::Css);
    /// ```
    #[must_use]
    pub fn from_mime_type(mime_type: Option<&str>) -> Self {
        match mime_type {
            Some(LESS_MIME_TYPE) => Self::Less,
            Some(SCSS_MIME_TYPE) => Self::Scss,
            _ => Self::Css,
        }
    }

    /// The canonical media type of this dialect.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Css => CSS_MIME_TYPE,
            Self::Less => LESS_MIME_TYPE,
            Self::Scss => SCSS_MIME_TYPE,
        }
    }

    /// True for LESS sources.
    #[must_use]
    pub const fn is_less(self) -> bool {
        matches!(self, Self::Less)
    }

    /// True for SCSS sources.
    #[must_use]
    pub const fn is_scss(self) -> bool {
        matches!(self, Self::Scss)
    }

    /// True for either preprocessor dialect.
    #[must_use]
    pub const fn is_preprocessor(self) -> bool {
        !matches!(self, Self::Css)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Css => "css",
            Self::Less => "less",
            Self::Scss => "scss",
        })
    }
}

/// Error returned when a dialect name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stylesheet dialect '{0}' (expected css, less or scss)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "css" => Ok(Self::Css),
            "less" => Ok(Self::Less),
            "scss" => Ok(Self::Scss),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

/// Dialect queries that rule engines call back into.
pub trait DialectPredicates {
    /// True when LESS-only rules are enabled.
    fn is_less_source(&self) -> bool;

    /// True when SCSS-only rules are enabled.
    fn is_scss_source(&self) -> bool;

    /// True when rules shared by LESS and SCSS are enabled.
    fn is_preprocessor_source(&self) -> bool {
        self.is_less_source() || self.is_scss_source()
    }
}

impl DialectPredicates for Dialect {
    fn is_less_source(&self) -> bool {
        self.is_less()
    }

    fn is_scss_source(&self) -> bool {
        self.is_scss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_types_select_dialect() {
        assert_eq!(Dialect::from_mime_type(Some("text/scss")), Dialect::Scss);
        assert_eq!(Dialect::from_mime_type(Some("text/less")), Dialect::Less);
        assert_eq!(Dialect::from_mime_type(Some("text/css")), Dialect::Css);
    }

    #[test]
    fn media_type_match_is_exact() {
        assert_eq!(Dialect::from_mime_type(Some("TEXT/LESS")), Dialect::Css);
        assert_eq!(Dialect::from_mime_type(Some("")), Dialect::Css);
    }

    #[test]
    fn predicates_follow_dialect() {
        assert!(Dialect::Less.is_less_source());
        assert!(!Dialect::Less.is_scss_source());
        assert!(Dialect::Scss.is_preprocessor_source());
        assert!(!Dialect::Css.is_preprocessor_source());
    }

    #[test]
    fn parses_dialect_names() {
        assert_eq!("SCSS".parse::<Dialect>(), Ok(Dialect::Scss));
        assert_eq!(
            "sass".parse::<Dialect>().unwrap_err().to_string(),
            "unknown stylesheet dialect 'sass' (expected css, less or scss)"
        );
    }

    #[test]
    fn mime_type_round_trips() {
        for dialect in [Dialect::Css, Dialect::Less, Dialect::Scss] {
            assert_eq!(Dialect::from_mime_type(Some(dialect.mime_type())), dialect);
        }
    }
}
