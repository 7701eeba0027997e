//! Selection range over buffer coordinates.

use crate::Cursor;

/// A selection between an anchor (where it started) and an active end (the
/// cursor). The two are not necessarily in reading order; [`Selection::canonical`]
/// produces the ordered form. Columns are inclusive on both ends.
///
/// An absent selection is `Option::<Selection>::None`; a `Selection` with
/// `anchor == active` is a real zero-length range, which is a different thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Cursor,
    pub active: Cursor,
}

impl Selection {
    pub fn new(anchor: Cursor, active: Cursor) -> Self {
        Self { anchor, active }
    }

    /// Ordered copy with the head before the tail in reading order.
    /// Idempotent; the receiver is not mutated.
    pub fn canonical(&self) -> Self {
        if self.anchor <= self.active {
            Self {
                anchor: self.anchor,
                active: self.active,
            }
        } else {
            Self {
                anchor: self.active,
                active: self.anchor,
            }
        }
    }

    /// First selected position in reading order.
    pub fn start(&self) -> Cursor {
        self.canonical().anchor
    }

    /// Last selected position in reading order (inclusive).
    pub fn end(&self) -> Cursor {
        self.canonical().active
    }

    /// Whether the given position falls inside the selection.
    pub fn contains(&self, line: usize, column: usize) -> bool {
        let (start, end) = (self.start(), self.end());
        if line < start.line || line > end.line {
            return false;
        }
        if start.line == end.line {
            return column >= start.column && column <= end.column;
        }
        if line == start.line {
            return column >= start.column;
        }
        if line == end.line {
            return column <= end.column;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_orders_by_line_then_column() {
        let sel = Selection::new(Cursor::at(3, 1), Cursor::at(1, 4));
        let canon = sel.canonical();
        assert_eq!(canon.anchor, Cursor::at(1, 4));
        assert_eq!(canon.active, Cursor::at(3, 1));

        let sel = Selection::new(Cursor::at(2, 7), Cursor::at(2, 3));
        let canon = sel.canonical();
        assert_eq!(canon.anchor, Cursor::at(2, 3));
        assert_eq!(canon.active, Cursor::at(2, 7));
    }

    #[test]
    fn canonical_is_idempotent() {
        let sel = Selection::new(Cursor::at(5, 0), Cursor::at(0, 5));
        assert_eq!(sel.canonical(), sel.canonical().canonical());
    }

    #[test]
    fn canonical_does_not_mutate() {
        let sel = Selection::new(Cursor::at(3, 0), Cursor::at(0, 0));
        let _ = sel.canonical();
        assert_eq!(sel.anchor, Cursor::at(3, 0));
    }

    #[test]
    fn contains_multi_line() {
        let sel = Selection::new(Cursor::at(1, 3), Cursor::at(3, 2));
        assert!(!sel.contains(0, 9));
        assert!(!sel.contains(1, 2));
        assert!(sel.contains(1, 3));
        assert!(sel.contains(2, 0)); // interior row, any column
        assert!(sel.contains(2, 99));
        assert!(sel.contains(3, 2));
        assert!(!sel.contains(3, 3));
        assert!(!sel.contains(4, 0));
    }

    #[test]
    fn contains_single_line_needs_both_bounds() {
        let sel = Selection::new(Cursor::at(2, 4), Cursor::at(2, 6));
        assert!(!sel.contains(2, 3));
        assert!(sel.contains(2, 4));
        assert!(sel.contains(2, 6));
        assert!(!sel.contains(2, 7));
    }

    #[test]
    fn zero_length_selection_is_not_absent() {
        let sel = Selection::new(Cursor::at(1, 1), Cursor::at(1, 1));
        assert!(sel.contains(1, 1));
        assert!(!sel.contains(1, 2));
    }
}
