//! The ordered row sequence and its mutation operations.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use milo_highlight::{syntax_for_path, Highlight, Syntax};

use crate::{Cursor, Row, Selection};

/// Single text buffer: the ordered rows plus file identity and dirty state.
///
/// All positional arguments are clamped to valid bounds instead of erroring;
/// an out-of-range row insertion is a no-op. Every mutation recomputes the
/// affected row's rendered form and highlight, then cascades the
/// open-comment flag forward until it stops changing.
#[derive(Debug)]
pub struct Buffer {
    rows: Vec<Row>,
    dirty: bool,
    path: Option<PathBuf>,
    syntax: Option<&'static Syntax>,
    tab_stop: usize,
}

impl Default for Buffer {
    /// Empty buffer with the fallback tab stop. The derived impl would
    /// zero `tab_stop`, which tab rendering divides by.
    fn default() -> Self {
        Self::new(crate::DEFAULT_TAB_STOP)
    }
}

impl Buffer {
    /// Create a new empty buffer.
    pub fn new(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            dirty: false,
            path: None,
            syntax: None,
            tab_stop: tab_stop.max(1),
        }
    }

    /// Load a file. Trailing carriage returns are stripped per line; the
    /// line feed itself is the separator and is not stored.
    pub fn from_file<P: AsRef<Path>>(path: P, tab_stop: usize) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let mut buffer = Self::new(tab_stop);
        buffer.path = Some(path.to_path_buf());
        buffer.syntax = syntax_for_path(path);

        if !data.is_empty() {
            let mut pieces: Vec<&[u8]> = data.split(|&b| b == b'\n').collect();
            if data.ends_with(b"\n") {
                pieces.pop();
            }
            for piece in pieces {
                let mut line = piece.to_vec();
                while line.last() == Some(&b'\r') {
                    line.pop();
                }
                buffer.rows.push(Row::new(line));
            }
            buffer.rehighlight_all();
        }

        buffer.dirty = false;
        Ok(buffer)
    }

    /// Serialize all rows, each followed by a single line feed.
    pub fn contents(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for row in &self.rows {
            out.extend_from_slice(row.chars());
            out.push(b'\n');
        }
        out
    }

    /// Save to the buffer's path. Returns the number of bytes written.
    pub fn save(&mut self) -> Result<usize> {
        let path = self
            .path
            .clone()
            .context("No file path set for this buffer")?;
        self.save_to(&path)
    }

    /// Save to a specific path, adopting it as the buffer's path and
    /// re-selecting the language profile from it.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref().to_path_buf();
        let written = self.save_to(&path)?;
        self.path = Some(path);
        self.select_syntax();
        Ok(written)
    }

    fn save_to(&mut self, path: &Path) -> Result<usize> {
        let contents = self.contents();
        std::fs::write(path, &contents)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        self.dirty = false;
        Ok(contents.len())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
    }

    pub fn syntax(&self) -> Option<&'static Syntax> {
        self.syntax
    }

    pub fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    /// Raw length of a row, 0 when out of range.
    pub fn line_len(&self, line: usize) -> usize {
        self.rows.get(line).map_or(0, Row::len)
    }

    /// Re-select the language profile from the current path and recompute
    /// every row's classification.
    pub fn select_syntax(&mut self) {
        self.syntax = self.path.as_deref().and_then(syntax_for_path);
        self.rehighlight_all();
    }

    fn rehighlight_all(&mut self) {
        for i in 0..self.rows.len() {
            let prev = i
                .checked_sub(1)
                .map_or(false, |p| self.rows[p].open_comment());
            self.rows[i].update_render(self.tab_stop);
            self.rows[i].update_highlight(self.syntax, prev);
        }
    }

    /// Recompute one row's rendering and highlight, then cascade forward.
    fn touch_row(&mut self, at: usize) {
        if at < self.rows.len() {
            self.rows[at].update_render(self.tab_stop);
        }
        self.cascade_from(at);
    }

    /// Forward highlight cascade: recompute rows until one's open-comment
    /// flag comes out unchanged. An unterminated comment spanning the whole
    /// file walks every row exactly once.
    fn cascade_from(&mut self, mut at: usize) {
        while at < self.rows.len() {
            let prev = at
                .checked_sub(1)
                .map_or(false, |p| self.rows[p].open_comment());
            let changed = self.rows[at].update_highlight(self.syntax, prev);
            if !changed {
                break;
            }
            at += 1;
        }
    }

    /// Insert a row at the given index. Out of range is a no-op.
    pub fn insert_row(&mut self, at: usize, text: &[u8]) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::new(text.to_vec()));
        self.touch_row(at);
        self.dirty = true;
    }

    /// Delete the row at the given index and reclassify what moved up.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        // The row now at `at` has a new predecessor.
        self.cascade_from(at);
        self.dirty = true;
    }

    /// Insert one byte into a row. A cursor line equal to the row count
    /// means "append a fresh row first".
    pub fn insert_char(&mut self, line: usize, col: usize, b: u8) {
        if line >= self.rows.len() {
            self.rows.push(Row::new(Vec::new()));
        }
        let line = line.min(self.rows.len() - 1);
        self.rows[line].insert_byte(col, b);
        self.touch_row(line);
        self.dirty = true;
    }

    /// Delete the byte at the given position. Out of range is a no-op.
    pub fn delete_char(&mut self, line: usize, col: usize) {
        let Some(row) = self.rows.get_mut(line) else {
            return;
        };
        if col >= row.len() {
            return;
        }
        row.delete_byte(col);
        self.touch_row(line);
        self.dirty = true;
    }

    /// Append bytes to the end of a row.
    pub fn append_to_row(&mut self, line: usize, suffix: &[u8]) {
        let Some(row) = self.rows.get_mut(line) else {
            return;
        };
        row.append(suffix);
        self.touch_row(line);
        self.dirty = true;
    }

    /// Split a row at a column: everything from the column onward moves to a
    /// new row inserted right after it.
    pub fn split_row(&mut self, line: usize, col: usize) {
        if line >= self.rows.len() {
            self.insert_row(self.rows.len(), &[]);
            return;
        }
        let col = col.min(self.rows[line].len());
        let tail: Vec<u8> = self.rows[line].chars()[col..].to_vec();
        self.rows[line].truncate(col);
        self.insert_row(line + 1, &tail);
        self.touch_row(line);
        self.dirty = true;
    }

    /// Join the next row onto this one.
    pub fn join_row(&mut self, line: usize) {
        if line + 1 >= self.rows.len() {
            return;
        }
        let next: Vec<u8> = self.rows[line + 1].chars().to_vec();
        self.rows[line].append(&next);
        self.rows.remove(line + 1);
        self.touch_row(line);
        self.dirty = true;
    }

    /// Selected text, rows separated by a line feed. Tail column inclusive.
    pub fn selection_text(&self, sel: &Selection) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        let canon = sel.canonical();
        let max = self.rows.len() - 1;
        let (start, end) = (canon.anchor, canon.active);
        let start_line = start.line.min(max);
        let end_line = end.line.min(max);
        let start_col = start.column.min(self.rows[start_line].len());
        let end_take = end.column.saturating_add(1).min(self.rows[end_line].len());

        if start_line == end_line {
            let row = self.rows[start_line].chars();
            let end_take = end_take.max(start_col);
            return String::from_utf8_lossy(&row[start_col..end_take]).into_owned();
        }

        let mut out = Vec::new();
        out.extend_from_slice(&self.rows[start_line].chars()[start_col..]);
        out.push(b'\n');
        for row in &self.rows[start_line + 1..end_line] {
            out.extend_from_slice(row.chars());
            out.push(b'\n');
        }
        out.extend_from_slice(&self.rows[end_line].chars()[..end_take]);
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Delete a selected range: the head row's prefix is spliced with the
    /// tail row's suffix into one row at the head position, interior rows
    /// are removed, and the cursor lands on the join point.
    pub fn delete_selection(&mut self, sel: &Selection) -> Cursor {
        if self.rows.is_empty() {
            return Cursor::new();
        }
        let canon = sel.canonical();
        let max = self.rows.len() - 1;
        let start_line = canon.anchor.line.min(max);
        let end_line = canon.active.line.min(max);
        let start_col = canon.anchor.column.min(self.rows[start_line].len());
        let suffix_from = canon
            .active
            .column
            .saturating_add(1)
            .min(self.rows[end_line].len());
        let suffix_from = if start_line == end_line {
            suffix_from.max(start_col)
        } else {
            suffix_from
        };

        let suffix: Vec<u8> = self.rows[end_line].chars()[suffix_from..].to_vec();
        self.rows[start_line].splice_tail(start_col, &suffix);
        if end_line > start_line {
            self.rows.drain(start_line + 1..=end_line);
        }
        self.touch_row(start_line);
        self.dirty = true;
        Cursor::at(start_line, start_col)
    }

    /// Copy of a row's highlight array, for the search overlay.
    pub fn snapshot_highlight(&self, line: usize) -> Option<Vec<Highlight>> {
        self.rows.get(line).map(|r| r.highlight().to_vec())
    }

    /// Restore a previously saved highlight array verbatim. Ignored when
    /// the row changed shape in the meantime.
    pub fn restore_highlight(&mut self, line: usize, highlight: Vec<Highlight>) {
        if let Some(row) = self.rows.get_mut(line) {
            row.set_highlight(highlight);
        }
    }

    /// Overwrite a rendered span with the match classification.
    pub fn overlay_match(&mut self, line: usize, start: usize, len: usize) {
        if let Some(row) = self.rows.get_mut(line) {
            row.overlay(start, len, Highlight::Match);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milo_highlight::Highlight;
    use std::io::Write;

    fn buffer_with(lines: &[&str]) -> Buffer {
        let mut buf = Buffer::new(8);
        for (i, line) in lines.iter().enumerate() {
            buf.insert_row(i, line.as_bytes());
        }
        buf
    }

    fn c_buffer_with(lines: &[&str]) -> Buffer {
        let mut buf = buffer_with(lines);
        buf.path = Some("test.c".into());
        buf.select_syntax();
        buf
    }

    fn row_text(buf: &Buffer, line: usize) -> String {
        String::from_utf8_lossy(buf.row(line).unwrap().chars()).into_owned()
    }

    #[test]
    fn render_and_highlight_lengths_agree_after_mutations() {
        let mut buf = c_buffer_with(&["int\tx;", "y = 1;"]);
        buf.insert_char(0, 3, b'\t');
        buf.delete_char(1, 0);
        buf.split_row(0, 2);
        buf.join_row(1);
        for i in 0..buf.len() {
            let row = buf.row(i).unwrap();
            assert_eq!(row.render().len(), row.highlight().len());
        }
    }

    #[test]
    fn default_buffer_renders_tabs() {
        let mut buf = Buffer::default();
        buf.insert_row(0, b"\tx");
        assert_eq!(buf.tab_stop(), crate::DEFAULT_TAB_STOP);
        assert_eq!(buf.row(0).unwrap().render(), b"        x");
    }

    #[test]
    fn delete_row_recascades_the_row_that_moves_up() {
        let mut buf = c_buffer_with(&["/* open", "done */", "x = 1;"]);
        assert!(!buf.row(2).unwrap().open_comment());

        // Removing the closing row leaves its successor inside the comment.
        buf.delete_row(1);
        assert_eq!(buf.len(), 2);
        assert!(buf.row(1).unwrap().open_comment());
        assert!(buf
            .row(1)
            .unwrap()
            .highlight()
            .iter()
            .all(|&h| h == Highlight::MultilineComment));
    }

    #[test]
    fn delete_row_out_of_range_is_noop() {
        let mut buf = buffer_with(&["a"]);
        buf.dirty = false;
        buf.delete_row(3);
        assert_eq!(buf.len(), 1);
        assert!(!buf.is_dirty());
    }

    #[test]
    fn insert_row_out_of_range_is_noop() {
        let mut buf = buffer_with(&["a"]);
        buf.insert_row(5, b"b");
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn insert_char_past_last_row_appends() {
        let mut buf = buffer_with(&["a"]);
        buf.insert_char(1, 0, b'b');
        assert_eq!(buf.len(), 2);
        assert_eq!(row_text(&buf, 1), "b");
    }

    #[test]
    fn mutations_set_dirty() {
        let mut buf = buffer_with(&["abc"]);
        buf.dirty = false;
        buf.delete_char(0, 1);
        assert!(buf.is_dirty());
        assert_eq!(row_text(&buf, 0), "ac");
    }

    #[test]
    fn delete_char_out_of_range_is_noop() {
        let mut buf = buffer_with(&["ab"]);
        buf.dirty = false;
        buf.delete_char(0, 5);
        buf.delete_char(9, 0);
        assert!(!buf.is_dirty());
    }

    #[test]
    fn split_and_join_are_inverse() {
        let mut buf = buffer_with(&["hello world"]);
        buf.split_row(0, 5);
        assert_eq!(buf.len(), 2);
        assert_eq!(row_text(&buf, 0), "hello");
        assert_eq!(row_text(&buf, 1), " world");
        buf.join_row(0);
        assert_eq!(buf.len(), 1);
        assert_eq!(row_text(&buf, 0), "hello world");
    }

    #[test]
    fn open_comment_propagates_to_next_row() {
        let buf = c_buffer_with(&["/* open", "inside"]);
        assert!(buf.row(0).unwrap().open_comment());
        assert!(buf
            .row(1)
            .unwrap()
            .highlight()
            .iter()
            .all(|&h| h == Highlight::MultilineComment));
        assert!(buf.row(1).unwrap().open_comment());
    }

    #[test]
    fn closing_comment_stops_cascade_when_state_settles() {
        let mut buf = c_buffer_with(&["/* open", "text", "x = 1;"]);
        // Line 2 starts inside the comment.
        assert!(buf.row(2).unwrap().open_comment());
        // Close the comment on line 1; lines 1 and 2 flip, then settle.
        buf.append_to_row(1, b" */");
        assert!(!buf.row(1).unwrap().open_comment());
        assert!(!buf.row(2).unwrap().open_comment());
        assert_eq!(buf.row(2).unwrap().highlight()[0], Highlight::Normal);
    }

    #[test]
    fn cascade_from_stops_at_unchanged_row() {
        let mut buf = c_buffer_with(&["/* a */", "b", "c"]);
        // Re-opening a comment on row 0 flips rows 1 and 2; closing it again
        // flips them back, and each pass stops at the first settled row.
        buf.append_to_row(0, b" /*");
        assert!(buf.row(2).unwrap().open_comment());
        buf.append_to_row(0, b" */");
        assert!(!buf.row(1).unwrap().open_comment());
        assert!(!buf.row(2).unwrap().open_comment());
    }

    #[test]
    fn selection_text_single_row() {
        let buf = buffer_with(&["hello"]);
        let sel = Selection::new(Cursor::at(0, 1), Cursor::at(0, 3));
        assert_eq!(buf.selection_text(&sel), "ell");
    }

    #[test]
    fn selection_text_multi_row() {
        let buf = buffer_with(&["abcd", "efgh", "ijkl"]);
        let sel = Selection::new(Cursor::at(0, 2), Cursor::at(2, 1));
        assert_eq!(buf.selection_text(&sel), "cd\nefgh\nij");
    }

    #[test]
    fn selection_text_reversed_range() {
        let buf = buffer_with(&["abcd", "efgh"]);
        let sel = Selection::new(Cursor::at(1, 1), Cursor::at(0, 2));
        assert_eq!(buf.selection_text(&sel), "cd\nef");
    }

    #[test]
    fn delete_selection_splices_head_and_tail() {
        let mut buf = buffer_with(&["abcdef", "ghijkl"]);
        let sel = Selection::new(Cursor::at(0, 2), Cursor::at(1, 3));
        let cursor = buf.delete_selection(&sel);
        assert_eq!(buf.len(), 1);
        assert_eq!(row_text(&buf, 0), "abkl");
        assert_eq!(cursor, Cursor::at(0, 2));
    }

    #[test]
    fn delete_selection_three_rows() {
        let mut buf = buffer_with(&["aaa", "bbb", "ccc"]);
        let sel = Selection::new(Cursor::at(0, 1), Cursor::at(2, 0));
        let cursor = buf.delete_selection(&sel);
        assert_eq!(buf.len(), 1);
        assert_eq!(row_text(&buf, 0), "acc");
        assert_eq!(cursor, Cursor::at(0, 1));
    }

    #[test]
    fn delete_selection_grows_head_row() {
        // Joined row longer than the original head row.
        let mut buf = buffer_with(&["ab", "cdefghij"]);
        let sel = Selection::new(Cursor::at(0, 1), Cursor::at(1, 0));
        buf.delete_selection(&sel);
        assert_eq!(row_text(&buf, 0), "adefghij");
    }

    #[test]
    fn delete_selection_clamps_out_of_range_tail() {
        let mut buf = buffer_with(&["abc", "def"]);
        let sel = Selection::new(Cursor::at(0, 0), Cursor::at(9, 99));
        let cursor = buf.delete_selection(&sel);
        assert_eq!(buf.len(), 1);
        assert_eq!(row_text(&buf, 0), "");
        assert_eq!(cursor, Cursor::at(0, 0));
    }

    #[test]
    fn load_strips_carriage_returns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"one\r\ntwo\nthree\r\n").unwrap();
        let buf = Buffer::from_file(file.path(), 8).unwrap();
        assert_eq!(buf.len(), 3);
        assert_eq!(row_text(&buf, 0), "one");
        assert_eq!(row_text(&buf, 1), "two");
        assert_eq!(row_text(&buf, 2), "three");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn save_joins_rows_with_line_feed() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut buf = buffer_with(&["a", "b"]);
        let written = buf.save_as(file.path()).unwrap();
        assert_eq!(written, 4);
        assert_eq!(std::fs::read(file.path()).unwrap(), b"a\nb\n");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn save_as_reselects_syntax() {
        let dir = tempfile::tempdir().unwrap();
        let mut buf = buffer_with(&["int x;"]);
        assert!(buf.syntax().is_none());
        buf.save_as(dir.path().join("file.c")).unwrap();
        assert_eq!(buf.syntax().unwrap().name, "c");
        assert_eq!(buf.row(0).unwrap().highlight()[0], Highlight::Type);
    }

    #[test]
    fn overlay_and_restore_highlight() {
        let mut buf = c_buffer_with(&["int x;"]);
        let saved = buf.snapshot_highlight(0).unwrap();
        buf.overlay_match(0, 4, 1);
        assert_eq!(buf.row(0).unwrap().highlight()[4], Highlight::Match);
        buf.restore_highlight(0, saved.clone());
        assert_eq!(buf.row(0).unwrap().highlight(), saved.as_slice());
    }
}
