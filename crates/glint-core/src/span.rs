//! Source location tracking.
//!
//! Every AST node owns a [`Span`] recording where it came from, and every
//! error carries the span of the construct that produced it. Rendering a
//! span yields the `line:col` form used in diagnostics.

use std::fmt;

/// A location in glint source, identified by where it starts.
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
    /// Create a span from a line, column, and length.
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }

    /// Extend this span to cover another one.
    ///
    /// Spans on different lines are approximated by keeping the first
    /// span's position and summing lengths.
    #[inline]
    pub fn to(self, other: Span) -> Span {
        if self.line == other.line {
            let start = self.col.min(other.col);
            let end = (self.col + self.len).max(other.col + other.len);
            Span {
                line: self.line,
                col: start,
                len: end - start,
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
    fn display_is_line_col() {
        assert_eq!(format!("{}", Span::new(7, 3, 5)), "7:3");
    }

    #[test]
    fn point_has_zero_length() {
        assert_eq!(Span::point(1, 4).len, 0);
    }

    #[test]
    fn to_covers_both_spans() {
        let a = Span::new(2, 5, 3);
        let b = Span::new(2, 12, 4);
        let merged = a.to(b);
        assert_eq!(merged.col, 5);
        assert_eq!(merged.len, 11);
    }

    #[test]
    fn to_across_lines_keeps_first_position() {
        let a = Span::new(1, 5, 3);
        let b = Span::new(4, 1, 2);
        let merged = a.to(b);
        assert_eq!(merged.line, 1);
        assert_eq!(merged.col, 5);
    }
}
