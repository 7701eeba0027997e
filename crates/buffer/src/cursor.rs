//! Cursor position in logical (pre-rendering) coordinates.

use std::cmp::min;

/// Cursor position in the document.
///
/// `line` may equal the row count, meaning "past the last row" (append
/// position). `column` counts raw bytes, not rendered cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Line number (0-based).
    pub line: usize,
    /// Byte offset within the line (0-based).
    pub column: usize,
}

impl Cursor {
    /// Create a new cursor at position (0, 0).
    pub fn new() -> Self {
        Self { line: 0, column: 0 }
    }

    /// Create cursor at specified position.
    pub fn at(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Clamp column to maximum line length.
    pub fn clamp_column(&mut self, max_column: usize) {
        self.column = min(self.column, max_column);
    }
}

impl PartialOrd for Cursor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cursor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.column.cmp(&other.column),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_by_line_then_column() {
        assert!(Cursor::at(0, 9) < Cursor::at(1, 0));
        assert!(Cursor::at(2, 3) < Cursor::at(2, 4));
        assert_eq!(Cursor::at(1, 1), Cursor::at(1, 1));
    }

    #[test]
    fn clamp_column() {
        let mut c = Cursor::at(0, 10);
        c.clamp_column(4);
        assert_eq!(c.column, 4);
    }
}
