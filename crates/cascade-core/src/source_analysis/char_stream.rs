// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Character streams feeding the lexical rules.
//!
//! [`SourceStream`] owns the raw text and the cursor. [`CaseFoldingStream`]
//! wraps any [`CharStream`] and upper-cases the values returned by
//! lookahead, so lexical rules can test keywords such as `@MEDIA`, `URL(` or
//! `!IMPORTANT` case-insensitively. The stored text is never rewritten:
//! positions and [`CharStream::substring`] always refer to the original
//! spelling.
//!
//! # Lookahead convention
//!
//! `la(1)` is the next unconsumed character, `la(2)` the one after it.
//! `la(0)` is reserved and always returns `None`. Negative indices look
//! backwards: `la(-1)` is the most recently consumed character. Any index
//! that falls outside the text yields `None`, the end-of-stream sentinel.

use std::sync::Arc;

use super::Span;

/// A saved cursor position, restorable with [`CharStream::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamMark {
    index: usize,
    line: u32,
    column: u32,
}

/// Cursor-based access to source characters.
pub trait CharStream {
    /// Looks at the character `i` positions from the cursor (see module docs).
    fn la(&self, i: isize) -> Option<char>;

    /// Advances the cursor by one character. Does nothing at end of input.
    fn consume(&mut self);

    /// Byte offset of the cursor in the source text.
    fn offset(&self) -> u32;

    /// 1-based line of the cursor.
    fn line(&self) -> u32;

    /// 0-based column (in characters) of the cursor.
    fn column(&self) -> u32;

    /// Saves the cursor position.
    fn mark(&self) -> StreamMark;

    /// Restores a cursor position saved by [`CharStream::mark`].
    fn seek(&mut self, mark: StreamMark);

    /// The full original source text.
    fn source(&self) -> &str;

    /// Original-case text covered by `span`.
    fn substring(&self, span: Span) -> &str {
        self.source().get(span.as_range()).unwrap_or("")
    }
}

/// The raw character stream over a shared source text.
#[derive(Debug, Clone)]
pub struct SourceStream {
    source: Arc<str>,
    /// Byte offset of every character, in order.
    offsets: Vec<u32>,
    chars: Vec<char>,
    index: usize,
    line: u32,
    column: u32,
}

impl SourceStream {
    /// Creates a stream positioned at the start of `source`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "stylesheets over 4GB are not supported"
    )]
    #[must_use]
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        let source = source.into();
        let (offsets, chars) = source
            .char_indices()
            .map(|(offset, c)| (offset as u32, c))
            .unzip();
        Self {
            source,
            offsets,
            chars,
            index: 0,
            line: 1,
            column: 0,
        }
    }

    /// The shared source text.
    #[must_use]
    pub fn shared_source(&self) -> Arc<str> {
        Arc::clone(&self.source)
    }

    /// Number of characters in the stream.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.chars.len()
    }

    /// Character index of the cursor.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl CharStream for SourceStream {
    fn la(&self, i: isize) -> Option<char> {
        let target = match i {
            0 => return None,
            i if i > 0 => self.index.checked_add(i.unsigned_abs() - 1)?,
            i => self.index.checked_sub(i.unsigned_abs())?,
        };
        self.chars.get(target).copied()
    }

    fn consume(&mut self) {
        let Some(&c) = self.chars.get(self.index) else {
            return;
        };
        self.index += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "stylesheets over 4GB are not supported"
    )]
    fn offset(&self) -> u32 {
        self.offsets
            .get(self.index)
            .copied()
            .unwrap_or(self.source.len() as u32)
    }

    fn line(&self) -> u32 {
        self.line
    }

    fn column(&self) -> u32 {
        self.column
    }

    fn mark(&self) -> StreamMark {
        StreamMark {
            index: self.index,
            line: self.line,
            column: self.column,
        }
    }

    fn seek(&mut self, mark: StreamMark) {
        self.index = mark.index.min(self.chars.len());
        self.line = mark.line;
        self.column = mark.column;
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// Upper-cases lookahead values while delegating everything else.
#[derive(Debug, Clone)]
pub struct CaseFoldingStream<S = SourceStream> {
    inner: S,
}

impl<S: CharStream> CaseFoldingStream<S> {
    /// Wraps a raw stream.
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Returns the wrapped raw stream.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwraps the raw stream.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl CaseFoldingStream<SourceStream> {
    /// Convenience constructor over a fresh [`SourceStream`].
    #[must_use]
    pub fn from_source(source: impl Into<Arc<str>>) -> Self {
        Self::new(SourceStream::new(source))
    }
}

impl<S: CharStream> CharStream for CaseFoldingStream<S> {
    fn la(&self, i: isize) -> Option<char> {
        self.inner.la(i).map(fold)
    }

    fn consume(&mut self) {
        self.inner.consume();
    }

    fn offset(&self) -> u32 {
        self.inner.offset()
    }

    fn line(&self) -> u32 {
        self.inner.line()
    }

    fn column(&self) -> u32 {
        self.inner.column()
    }

    fn mark(&self) -> StreamMark {
        self.inner.mark()
    }

    fn seek(&mut self, mark: StreamMark) {
        self.inner.seek(mark);
    }

    fn source(&self) -> &str {
        self.inner.source()
    }
}

/// Single-character upper-case mapping; multi-character expansions
/// (`ß` → `SS`) leave the character unchanged.
fn fold(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_uppercase();
    }
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}
