//! One line of buffered text with its derived rendered form.

use milo_highlight::{highlight_line, Highlight, Syntax};

/// One row: raw content, rendered content (tabs expanded to spaces) and the
/// per-cell highlight classification.
///
/// The rendered form is a pure function of the raw content and the tab stop
/// width. `render.len() == highlight.len()` holds after every update; the
/// buffer is responsible for calling [`Row::update_render`] and
/// [`Row::update_highlight`] after each mutation.
#[derive(Debug, Clone, Default)]
pub struct Row {
    chars: Vec<u8>,
    render: Vec<u8>,
    highlight: Vec<Highlight>,
    /// True when the row ends inside an unterminated block comment.
    open_comment: bool,
}

impl Row {
    pub fn new(chars: Vec<u8>) -> Self {
        Self {
            chars,
            render: Vec::new(),
            highlight: Vec::new(),
            open_comment: false,
        }
    }

    /// Raw content length in bytes.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    pub fn render(&self) -> &[u8] {
        &self.render
    }

    pub fn highlight(&self) -> &[Highlight] {
        &self.highlight
    }

    pub fn open_comment(&self) -> bool {
        self.open_comment
    }

    /// Rebuild the rendered form: each tab becomes spaces up to the next
    /// multiple of `tab_stop`, everything else passes through unchanged.
    pub(crate) fn update_render(&mut self, tab_stop: usize) {
        self.render.clear();
        for &b in &self.chars {
            if b == b'\t' {
                self.render.push(b' ');
                while self.render.len() % tab_stop != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(b);
            }
        }
    }

    /// Reclassify the row. Returns true when the open-comment flag changed,
    /// which obliges the caller to recompute the next row as well.
    pub(crate) fn update_highlight(
        &mut self,
        syntax: Option<&Syntax>,
        prev_open_comment: bool,
    ) -> bool {
        let (hl, open) = highlight_line(&self.render, syntax, prev_open_comment);
        self.highlight = hl;
        let changed = self.open_comment != open;
        self.open_comment = open;
        changed
    }

    /// Replace the whole highlight array, e.g. to restore a saved copy after
    /// a search overlay. Ignored if the length does not match the rendering.
    pub(crate) fn set_highlight(&mut self, highlight: Vec<Highlight>) {
        if highlight.len() == self.render.len() {
            self.highlight = highlight;
        }
    }

    /// Overwrite a span of rendered cells with a classification.
    pub(crate) fn overlay(&mut self, start: usize, len: usize, hl: Highlight) {
        let start = start.min(self.highlight.len());
        let end = (start + len).min(self.highlight.len());
        for cell in &mut self.highlight[start..end] {
            *cell = hl;
        }
    }

    pub(crate) fn insert_byte(&mut self, at: usize, b: u8) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, b);
    }

    pub(crate) fn delete_byte(&mut self, at: usize) {
        if at < self.chars.len() {
            self.chars.remove(at);
        }
    }

    pub(crate) fn append(&mut self, suffix: &[u8]) {
        self.chars.extend_from_slice(suffix);
    }

    pub(crate) fn truncate(&mut self, at: usize) {
        self.chars.truncate(at);
    }

    /// Splice this row into prefix-before-`at` plus `suffix`. Used by range
    /// deletion; `Vec::truncate` + `extend_from_slice` keeps the copy safe
    /// even when the suffix came from this same row.
    pub(crate) fn splice_tail(&mut self, at: usize, suffix: &[u8]) {
        self.truncate(at.min(self.chars.len()));
        self.chars.extend_from_slice(suffix);
    }

    /// Translate a logical byte column to a visual (rendered) column.
    pub fn visual_col(&self, column: usize, tab_stop: usize) -> usize {
        let mut rx = 0;
        for &b in self.chars.iter().take(column) {
            if b == b'\t' {
                rx += (tab_stop - 1) - (rx % tab_stop);
            }
            rx += 1;
        }
        rx
    }

    /// Translate a visual column back to a logical byte column.
    ///
    /// Monotonic inverse scan: a visual position inside a tab's cell span
    /// resolves to the tab's own logical column.
    pub fn logical_col(&self, visual: usize, tab_stop: usize) -> usize {
        let mut rx = 0;
        for (cx, &b) in self.chars.iter().enumerate() {
            if b == b'\t' {
                rx += (tab_stop - 1) - (rx % tab_stop);
            }
            rx += 1;
            if rx > visual {
                return cx;
            }
        }
        self.chars.len()
    }
}
