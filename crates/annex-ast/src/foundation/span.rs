//! Source location tracking within one annotation expression.
//!
//! Annotation expressions are standalone snippets of text, one per slot.
//! A [`Span`] therefore points into a single expression's text rather than
//! into a file: the [`ExpressionText`](crate::ExpressionText) carried by the
//! slot *is* the source, and error messages quote it directly.
//!
//! # Examples
//!
//! ```
//! # use annex_ast::foundation::span::Span;
//! let text = "Config | None";
//! let span = Span::new(0, 6);
//!
//! assert_eq!(span.snippet(text), "Config");
//! ```

use serde::{Deserialize, Serialize};

/// Compact location reference into one expression's text.
///
/// Points to a byte range within the annotation text the expression was
/// parsed from. Total size: 8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of start position
    pub start: u32,
    /// Byte offset of end position (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a zero-length span at the start of the text.
    pub fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Check if this span is zero-length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Get the length of this span in bytes.
    ///
    /// # Panics
    /// Panics if end < start (malformed span).
    pub fn len(&self) -> u32 {
        assert!(
            self.end >= self.start,
            "malformed span: end ({}) < start ({})",
            self.end,
            self.start
        );
        self.end - self.start
    }

    /// Merge two spans (returns span covering both).
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Extend this span to include another span.
    pub fn extend(&mut self, other: &Span) {
        self.start = self.start.min(other.start);
        self.end = self.end.max(other.end);
    }

    /// Get the slice of `text` this span covers.
    ///
    /// Returns the empty string if the span does not fall on valid byte
    /// boundaries of `text` (a span from a different expression).
    pub fn snippet<'t>(&self, text: &'t str) -> &'t str {
        text.get(self.start as usize..self.end as usize)
            .unwrap_or("")
    }
}
