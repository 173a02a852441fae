// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Cascade stylesheet front-end.
//!
//! This crate contains the error-tolerant front-end for CSS, LESS and SCSS:
//! - Lexical analysis over a case-folding character stream
//! - Parsing with explicit resynchronization
//! - Parse trees built from parser events
//!
//! Failures never abort a parse. They come back as [`Diagnostic`]s next to
//! a tree that still covers the whole input.
//!
//! [`Diagnostic`]: source_analysis::Diagnostic

#![doc = include_str!("../../../README.md")]

pub mod source_analysis;
pub mod tree;

mod session;

pub use session::{ParseResult, ParseSession, SessionOptions, parse_source};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::source_analysis::{
        Diagnostic, DiagnosticCategory, Dialect, Span, Token, TokenKind,
    };
    pub use crate::tree::{Node, NodeKind, ParseTree};
    pub use crate::{ParseResult, ParseSession, SessionOptions, parse_source};
}
