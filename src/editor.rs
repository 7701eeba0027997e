//! Editor state and the main input loop.

use anyhow::Result;
use milo_buffer::{Buffer, Cursor, Selection};
use milo_config::Config;
use milo_keyboard::{decode, Arrow, Key};
use milo_search::{SearchKey, SearchState};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::screen::{Screen, View};
use crate::terminal::Terminal;
use crate::theme::Theme;

/// How long a status message stays visible.
const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Editor {
    terminal: Terminal,
    screen: Screen,
    buffer: Buffer,
    cursor: Cursor,
    /// Visual column of the cursor, derived from `cursor` during scroll.
    rx: usize,
    row_off: usize,
    col_off: usize,
    selection: Option<Selection>,
    search: SearchState,
    theme: Theme,
    status: String,
    status_time: Instant,
    quit_confirm_times: u8,
    quit_times: u8,
}

impl Editor {
    pub fn new(terminal: Terminal, config: &Config) -> Result<Self> {
        let (cols, rows) = terminal.size()?;
        Ok(Self {
            terminal,
            screen: Screen::new(cols, rows),
            buffer: Buffer::new(config.editor.tab_stop),
            cursor: Cursor::new(),
            rx: 0,
            row_off: 0,
            col_off: 0,
            selection: None,
            search: SearchState::new(),
            theme: Theme::from_name(&config.general.theme),
            status: String::from("HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find"),
            status_time: Instant::now(),
            quit_confirm_times: config.editor.quit_confirm_times,
            quit_times: config.editor.quit_confirm_times,
        })
    }

    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.buffer = Buffer::from_file(path, self.buffer.tab_stop())?;
        milo_logger::info(format!(
            "Opened {} ({} lines)",
            path.display(),
            self.buffer.len()
        ));
        Ok(())
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            self.scroll();
            self.refresh()?;
            let key = self.read_key()?;
            if !self.process_key(key)? {
                return Ok(());
            }
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.status_time = Instant::now();
    }

    /// Block for the next key, redrawing on each poll timeout so resizes
    /// and message expiry show up while idle.
    fn read_key(&mut self) -> Result<Key> {
        loop {
            let mut buf = [0u8; 8];
            let n = self.terminal.read_input(&mut buf)?;
            if n == 0 {
                self.check_resize()?;
                self.scroll();
                self.refresh()?;
                continue;
            }
            if let Some(key) = decode(&buf[..n]) {
                return Ok(key);
            }
        }
    }

    fn check_resize(&mut self) -> Result<()> {
        let (cols, rows) = self.terminal.size()?;
        let next = Screen::new(cols, rows);
        if next.cols != self.screen.cols || next.text_rows != self.screen.text_rows {
            self.screen = next;
        }
        Ok(())
    }

    /// Derive the visual cursor column and slide the viewport so the
    /// cursor is always on screen.
    fn scroll(&mut self) {
        self.rx = match self.buffer.row(self.cursor.line) {
            Some(row) => row.visual_col(self.cursor.column, self.buffer.tab_stop()),
            None => 0,
        };
        if self.cursor.line < self.row_off {
            self.row_off = self.cursor.line;
        }
        if self.cursor.line >= self.row_off + self.screen.text_rows {
            self.row_off = self.cursor.line + 1 - self.screen.text_rows;
        }
        if self.rx < self.col_off {
            self.col_off = self.rx;
        }
        if self.rx >= self.col_off + self.screen.cols {
            self.col_off = self.rx + 1 - self.screen.cols;
        }
    }

    fn refresh(&mut self) -> Result<()> {
        let message = if self.status_time.elapsed() < MESSAGE_TIMEOUT {
            self.status.as_str()
        } else {
            ""
        };
        let view = View {
            buffer: &self.buffer,
            selection: self.selection,
            theme: &self.theme,
            cursor: self.cursor,
            rx: self.rx,
            row_off: self.row_off,
            col_off: self.col_off,
            message,
        };
        self.screen.refresh(&view)
    }

    fn process_key(&mut self, key: Key) -> Result<bool> {
        match key {
            Key::Ctrl('q') => {
                if self.buffer.is_dirty() && self.quit_times > 0 {
                    self.set_status(format!(
                        "WARNING! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                        self.quit_times
                    ));
                    self.quit_times -= 1;
                    return Ok(true);
                }
                return Ok(false);
            }
            Key::Ctrl('s') => self.save()?,
            Key::Ctrl('f') => self.find()?,
            Key::Ctrl('g') => self.goto_line()?,
            Key::Ctrl('a') => self.select_all(),
            Key::Ctrl('c') => self.copy_selection(),
            Key::Ctrl('x') => self.cut_selection(),
            Key::Ctrl('v') => self.paste(),
            Key::Enter => self.insert_newline(),
            Key::Backspace | Key::Ctrl('h') => self.backspace(),
            Key::Delete => self.delete_forward(),
            Key::Arrow(arrow) => {
                self.selection = None;
                self.move_cursor(arrow);
            }
            Key::ShiftArrow(arrow) => self.extend_selection(arrow),
            Key::CtrlArrow(arrow) => {
                self.selection = None;
                self.move_word(arrow);
            }
            Key::Home => self.cursor.column = 0,
            Key::End => self.cursor.column = self.buffer.line_len(self.cursor.line),
            Key::PageUp => self.page(Arrow::Up),
            Key::PageDown => self.page(Arrow::Down),
            Key::Esc => self.selection = None,
            Key::Char(b) => self.insert_char(b),
            Key::Ctrl(_) => {}
        }
        if key != Key::Ctrl('q') {
            self.quit_times = self.quit_confirm_times;
        }
        Ok(true)
    }

    // ---- movement ----

    fn move_cursor(&mut self, arrow: Arrow) {
        match arrow {
            Arrow::Left => {
                if self.cursor.column > 0 {
                    self.cursor.column -= 1;
                } else if self.cursor.line > 0 {
                    self.cursor.line -= 1;
                    self.cursor.column = self.buffer.line_len(self.cursor.line);
                }
            }
            Arrow::Right => {
                let len = self.buffer.line_len(self.cursor.line);
                if self.cursor.column < len {
                    self.cursor.column += 1;
                } else if self.cursor.line + 1 < self.buffer.len() {
                    self.cursor.line += 1;
                    self.cursor.column = 0;
                }
            }
            Arrow::Up => {
                if self.cursor.line > 0 {
                    self.cursor.line -= 1;
                }
            }
            Arrow::Down => {
                if self.cursor.line + 1 <= self.buffer.len() {
                    self.cursor.line += 1;
                }
            }
        }
        // Snap to the end of a shorter line.
        self.cursor
            .clamp_column(self.buffer.line_len(self.cursor.line));
    }

    fn move_word(&mut self, arrow: Arrow) {
        match arrow {
            Arrow::Left => {
                self.move_cursor(Arrow::Left);
                while self.cursor.column > 0 {
                    let chars = match self.buffer.row(self.cursor.line) {
                        Some(row) => row.chars(),
                        None => break,
                    };
                    if milo_highlight::is_separator(chars[self.cursor.column - 1]) {
                        break;
                    }
                    self.cursor.column -= 1;
                }
            }
            Arrow::Right => {
                self.move_cursor(Arrow::Right);
                loop {
                    let chars = match self.buffer.row(self.cursor.line) {
                        Some(row) => row.chars(),
                        None => break,
                    };
                    if self.cursor.column >= chars.len()
                        || milo_highlight::is_separator(chars[self.cursor.column])
                    {
                        break;
                    }
                    self.cursor.column += 1;
                }
            }
            Arrow::Up | Arrow::Down => self.move_cursor(arrow),
        }
    }

    fn page(&mut self, direction: Arrow) {
        match direction {
            Arrow::Up => self.cursor.line = self.row_off,
            Arrow::Down => {
                self.cursor.line =
                    (self.row_off + self.screen.text_rows.saturating_sub(1)).min(self.buffer.len());
            }
            _ => return,
        }
        for _ in 0..self.screen.text_rows {
            self.move_cursor(direction);
        }
    }

    // ---- selection ----

    fn extend_selection(&mut self, arrow: Arrow) {
        let anchor = match self.selection {
            Some(sel) => sel.anchor,
            None => self.cursor,
        };
        self.move_cursor(arrow);
        self.selection = Some(Selection::new(anchor, self.cursor));
    }

    fn select_all(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let last = self.buffer.len() - 1;
        let tail = Cursor::at(last, self.buffer.line_len(last));
        self.selection = Some(Selection::new(Cursor::new(), tail));
        self.cursor = tail;
    }

    /// Remove the selected text if any, landing the cursor on the join
    /// point. Returns whether a selection was consumed.
    fn delete_selection(&mut self) -> bool {
        let Some(sel) = self.selection.take() else {
            return false;
        };
        self.cursor = self.buffer.delete_selection(&sel);
        true
    }

    // ---- clipboard ----

    fn copy_selection(&mut self) {
        let Some(sel) = self.selection else {
            self.set_status("Nothing selected");
            return;
        };
        let text = self.buffer.selection_text(&sel);
        match milo_clipboard::copy(&text) {
            Ok(()) => self.set_status(format!("Copied {} bytes", text.len())),
            Err(err) => {
                milo_logger::error(format!("Clipboard copy failed: {err:#}"));
                self.set_status("Clipboard unavailable");
            }
        }
    }

    fn cut_selection(&mut self) {
        let Some(sel) = self.selection else {
            self.set_status("Nothing selected");
            return;
        };
        let text = self.buffer.selection_text(&sel);
        if let Err(err) = milo_clipboard::copy(&text) {
            milo_logger::error(format!("Clipboard copy failed: {err:#}"));
            self.set_status("Clipboard unavailable");
            return;
        }
        self.delete_selection();
        self.set_status(format!("Cut {} bytes", text.len()));
    }

    fn paste(&mut self) {
        let Some(text) = milo_clipboard::paste() else {
            self.set_status("Clipboard is empty");
            return;
        };
        self.delete_selection();
        for b in text.bytes() {
            match b {
                b'\n' => self.insert_newline(),
                b'\r' => {}
                b'\t' => self.insert_char(b),
                _ if b.is_ascii_control() => {}
                _ => self.insert_char(b),
            }
        }
    }

    // ---- editing ----

    fn insert_char(&mut self, b: u8) {
        self.delete_selection();
        self.buffer
            .insert_char(self.cursor.line, self.cursor.column, b);
        self.cursor.column += 1;
    }

    fn insert_newline(&mut self) {
        self.delete_selection();
        self.buffer.split_row(self.cursor.line, self.cursor.column);
        self.cursor = Cursor::at(self.cursor.line + 1, 0);
    }

    fn backspace(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.cursor.column > 0 {
            self.buffer
                .delete_char(self.cursor.line, self.cursor.column - 1);
            self.cursor.column -= 1;
        } else if self.cursor.line > 0 {
            let prev_len = self.buffer.line_len(self.cursor.line - 1);
            self.buffer.join_row(self.cursor.line - 1);
            self.cursor = Cursor::at(self.cursor.line - 1, prev_len);
        }
    }

    fn delete_forward(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.cursor.column < self.buffer.line_len(self.cursor.line) {
            self.buffer.delete_char(self.cursor.line, self.cursor.column);
        } else {
            self.buffer.join_row(self.cursor.line);
        }
    }

    // ---- file operations ----

    fn save(&mut self) -> Result<()> {
        let result = if self.buffer.path().is_some() {
            self.buffer.save()
        } else {
            match self.prompt("Save as: ", PromptFilter::FreeText, |_, _, _| {})? {
                Some(path) => self.buffer.save_as(path),
                None => {
                    self.set_status("Save aborted");
                    return Ok(());
                }
            }
        };
        match result {
            Ok(bytes) => {
                milo_logger::info(format!("Saved {} bytes", bytes));
                self.set_status(format!("{} bytes written to disk", bytes));
            }
            Err(err) => {
                milo_logger::error(format!("Save failed: {err:#}"));
                self.set_status(format!("Can't save! {err}"));
            }
        }
        Ok(())
    }

    // ---- prompts ----

    /// Minibuffer line editor on the message bar. `on_key` runs after every
    /// keystroke with the current input, including the final Enter or Esc.
    /// Returns `None` when cancelled with Esc or accepted empty.
    fn prompt<F>(&mut self, label: &str, filter: PromptFilter, mut on_key: F) -> Result<Option<String>>
    where
        F: FnMut(&mut Self, &str, Key),
    {
        let mut input = String::new();
        loop {
            self.set_status(format!("{}{}", label, input));
            self.scroll();
            self.refresh()?;
            let key = self.read_key()?;
            match key {
                Key::Enter => {
                    on_key(self, &input, key);
                    self.set_status("");
                    if input.is_empty() {
                        return Ok(None);
                    }
                    return Ok(Some(input));
                }
                Key::Esc => {
                    on_key(self, &input, key);
                    self.set_status("");
                    return Ok(None);
                }
                Key::Backspace | Key::Ctrl('h') => {
                    input.pop();
                    on_key(self, &input, key);
                }
                Key::Char(b) if filter.accepts(b) => {
                    input.push(b as char);
                    on_key(self, &input, key);
                }
                _ => on_key(self, &input, key),
            }
        }
    }

    fn goto_line(&mut self) -> Result<()> {
        let Some(input) = self.prompt("Go to line: ", PromptFilter::Digits, |_, _, _| {})?
        else {
            return Ok(());
        };
        match input.parse::<usize>() {
            Ok(n) if n >= 1 => {
                let line = (n - 1).min(self.buffer.len().saturating_sub(1));
                self.cursor = Cursor::at(line, 0);
                self.selection = None;
            }
            _ => self.set_status(format!("Invalid line number: {}", input)),
        }
        Ok(())
    }

    // ---- search ----

    fn find(&mut self) -> Result<()> {
        let saved_cursor = self.cursor;
        let saved_row_off = self.row_off;
        let saved_col_off = self.col_off;

        let accepted = self.prompt(
            "Search (ESC/Arrows/Enter): ",
            PromptFilter::FreeText,
            |ed, query, key| {
                let search_key = match key {
                    Key::Enter => SearchKey::Accept,
                    Key::Esc => SearchKey::Cancel,
                    Key::Arrow(Arrow::Right) | Key::Arrow(Arrow::Down) => SearchKey::Next,
                    Key::Arrow(Arrow::Left) | Key::Arrow(Arrow::Up) => SearchKey::Prev,
                    _ => SearchKey::Edit,
                };
                if let Some(hit) = ed.search.keypress(&mut ed.buffer, query, search_key) {
                    ed.cursor = hit;
                    // Force scroll() to bring the match row to the top.
                    ed.row_off = ed.buffer.len();
                }
            },
        )?;

        self.search.restore_overlay(&mut self.buffer);
        if accepted.is_none() {
            self.cursor = saved_cursor;
            self.row_off = saved_row_off;
            self.col_off = saved_col_off;
        }
        Ok(())
    }
}

/// What the minibuffer lets through to its input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptFilter {
    FreeText,
    Digits,
}

impl PromptFilter {
    fn accepts(self, b: u8) -> bool {
        match self {
            PromptFilter::FreeText => !b.is_ascii_control(),
            PromptFilter::Digits => b.is_ascii_digit(),
        }
    }
}
