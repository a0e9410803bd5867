//! Source location tracking for diagnostics.
//!
//! Every token and expression node carries a [`Span`] so that type errors
//! can be reported at the operator or literal that caused them.

use std::fmt;

/// A location in source code.
///
/// Tracks the line:column where a token starts plus the byte length it covers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    /// Create a new span from a line, column, and length.
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }

    /// Whether this span is empty (zero length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The length of this span in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Extend this span so it also covers `other`.
    ///
    /// Spans on different lines keep the first position and sum the lengths.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        if self.line == other.line {
            let start_col = self.col.min(other.col);
            let end_col = (other.col + other.len).max(self.col + self.len);
            Span {
                line: self.line,
                col: start_col,
                len: end_col - start_col,
            }
        } else {
            Span {
                line: self.line,
                col: self.col,
                len: self.len + other.len,
            }
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let span = Span::new(1, 5, 10);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(Span::point(1, 5).is_empty());
    }

    #[test]
    fn span_display() {
        assert_eq!(format!("{}", Span::new(3, 15, 5)), "3:15");
    }

    #[test]
    fn merge_operands_on_one_line() {
        // `a + bb` : `a` at col 1, `bb` at col 5
        let merged = Span::new(1, 1, 1).merge(Span::new(1, 5, 2));
        assert_eq!(merged, Span::new(1, 1, 6));
    }

    #[test]
    fn merge_is_order_independent_on_one_line() {
        let a = Span::new(2, 10, 3);
        let b = Span::new(2, 4, 2);
        assert_eq!(a.merge(b), b.merge(a));
        assert_eq!(a.merge(b).col, 4);
    }

    #[test]
    fn merge_across_lines_keeps_first_position() {
        let merged = Span::new(1, 5, 10).merge(Span::new(3, 10, 5));
        assert_eq!(merged.line, 1);
        assert_eq!(merged.col, 5);
        assert_eq!(merged.len, 15);
    }
}
