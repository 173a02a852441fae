// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Tokens, tree nodes and diagnostics all carry a [`Span`] of byte offsets
//! into the *original* source text, never into the case-folded view.

use std::ops::Range;

/// A half-open `[start, end)` range of byte offsets in the source text.
///
/// # Examples
///
/// ```
/// use cascade_core::source_analysis::Span;
///
/// let span = Span::new(4, 9);
/// assert_eq!(span.len(), 5);
/// assert_eq!(&"a { color: red }"[span.as_range()], "color");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Span {
    start: u32,
    end: u32,
}

impl Span {
    /// Creates a new span from start and end byte offsets.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates a zero-width span positioned at `offset`.
    #[must_use]
    pub const fn at(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns the start byte offset.
    #[must_use]
    pub const fn start(self) -> u32 {
        self.start
    }

    /// Returns the end byte offset (exclusive).
    #[must_use]
    pub const fn end(self) -> u32 {
        self.end
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Returns true if `other` is fully contained within `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns true if the byte at `offset` lies inside the span.
    #[must_use]
    pub const fn covers(self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Creates a span that covers both `self` and `other`.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }

    /// Converts to a `Range<usize>` for indexing into source text.
    #[must_use]
    pub const fn as_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<Range<u32>> for Span {
    fn from(range: Range<u32>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<Range<usize>> for Span {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "stylesheets over 4GB are not supported"
    )]
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start as u32, range.end as u32)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.as_range()
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start as usize, span.len() as usize).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_width_span_at_offset() {
        let span = Span::at(12);
        assert!(span.is_empty());
        assert_eq!(span.start(), 12);
        assert!(!span.covers(12));
    }

    #[test]
    fn covers_is_half_open() {
        let span = Span::new(4, 9);
        assert!(span.covers(4));
        assert!(span.covers(8));
        assert!(!span.covers(9));
        assert!(!span.covers(3));
    }

    #[test]
    fn merge_out_of_order_spans() {
        let merged = Span::new(15, 20).merge(Span::new(5, 10));
        assert_eq!(merged, Span::new(5, 20));
        assert!(merged.contains(Span::new(10, 15)));
    }

    #[test]
    fn converts_to_and_from_ranges() {
        let span: Span = (3usize..8usize).into();
        assert_eq!(span, Span::new(3, 8));
        let range: Range<usize> = span.into();
        assert_eq!(range, 3..8);
    }

    #[test]
    fn converts_to_miette_span() {
        let source_span: miette::SourceSpan = Span::new(6, 10).into();
        assert_eq!(source_span.offset(), 6);
        assert_eq!(source_span.len(), 4);
    }
}
