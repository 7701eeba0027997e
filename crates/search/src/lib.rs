//! Incremental search for milo.
//!
//! Driven once per prompt keystroke: restore the previous match overlay,
//! interpret the keystroke, then scan for the next literal match with
//! wraparound in the active direction. The matched span is overlaid with
//! the match classification on a saved copy of the row's highlight array,
//! so the permanent highlight state never leaks.

use milo_buffer::{Buffer, Cursor};
use milo_highlight::Highlight;

/// Search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

impl SearchDirection {
    fn step(self) -> isize {
        match self {
            SearchDirection::Forward => 1,
            SearchDirection::Backward => -1,
        }
    }
}

/// What a prompt keystroke means to the search state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    /// Accept the current match and close the prompt.
    Accept,
    /// Abort the search; the caller restores the pre-search position.
    Cancel,
    /// Move to the next match in the forward direction.
    Next,
    /// Move to the next match in the backward direction.
    Prev,
    /// The query text changed; restart from scratch, forward.
    Edit,
}

/// Mutable search state: last matched row, direction, and the saved
/// highlight array of the row currently overlaid.
#[derive(Debug, Default)]
pub struct SearchState {
    last_match: Option<usize>,
    direction: SearchDirection,
    saved: Option<(usize, Vec<Highlight>)>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row of the most recent match, if any.
    pub fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    /// Put back the overlaid row's highlight array verbatim.
    pub fn restore_overlay(&mut self, buffer: &mut Buffer) {
        if let Some((line, saved)) = self.saved.take() {
            buffer.restore_highlight(line, saved);
        }
    }

    /// Process one prompt keystroke. Returns the cursor of the new match,
    /// if one was found; the caller moves the cursor there and forces the
    /// viewport to re-center.
    pub fn keypress(&mut self, buffer: &mut Buffer, query: &str, key: SearchKey) -> Option<Cursor> {
        // Undo the previous overlay before anything else so the match
        // classification never sticks.
        self.restore_overlay(buffer);

        match key {
            SearchKey::Accept | SearchKey::Cancel => {
                self.last_match = None;
                self.direction = SearchDirection::Forward;
                return None;
            }
            SearchKey::Next => self.direction = SearchDirection::Forward,
            SearchKey::Prev => self.direction = SearchDirection::Backward,
            SearchKey::Edit => {
                self.last_match = None;
                self.direction = SearchDirection::Forward;
            }
        }

        if query.is_empty() {
            return None;
        }
        if self.last_match.is_none() {
            self.direction = SearchDirection::Forward;
        }

        self.find_next(buffer, query)
    }

    /// Scan at most `buffer.len()` rows from the last match in the active
    /// direction, wrapping at both ends, looking for a literal substring of
    /// the rendered content.
    fn find_next(&mut self, buffer: &mut Buffer, query: &str) -> Option<Cursor> {
        let rows = buffer.len();
        if rows == 0 {
            return None;
        }

        let step = self.direction.step();
        let mut current = self.last_match.map_or(-1, |m| m as isize);

        for _ in 0..rows {
            current += step;
            if current < 0 {
                current = rows as isize - 1;
            } else if current >= rows as isize {
                current = 0;
            }
            let line = current as usize;

            let row = buffer.row(line)?;
            if let Some(rx) = find_substring(row.render(), query.as_bytes()) {
                let column = row.logical_col(rx, buffer.tab_stop());
                self.last_match = Some(line);
                self.saved = Some((line, buffer.snapshot_highlight(line)?));
                buffer.overlay_match(line, rx, query.len());
                return Some(Cursor::at(line, column));
            }
        }
        None
    }
}

/// First occurrence of `needle` in `haystack`, byte-wise.
fn find_substring(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
