//! Screen drawing: text rows with syntax colors, status bar, message bar.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use milo_buffer::{Buffer, Cursor, Row, Selection};
use std::io::{self, Write};

use crate::theme::Theme;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything the renderer needs for one frame, borrowed from the editor.
pub struct View<'a> {
    pub buffer: &'a Buffer,
    pub selection: Option<Selection>,
    pub theme: &'a Theme,
    pub cursor: Cursor,
    /// Visual column of the cursor within its row.
    pub rx: usize,
    pub row_off: usize,
    pub col_off: usize,
    pub message: &'a str,
}

/// Screen geometry. The last two terminal rows are reserved for the
/// status bar and the message bar.
#[derive(Debug, Clone, Copy)]
pub struct Screen {
    pub cols: usize,
    pub text_rows: usize,
}

impl Screen {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols: cols as usize,
            text_rows: (rows as usize).saturating_sub(2),
        }
    }

    /// Redraw the whole frame and position the terminal cursor.
    pub fn refresh(&self, view: &View) -> Result<()> {
        let mut out = io::stdout().lock();
        queue!(out, Hide, MoveTo(0, 0))?;

        for y in 0..self.text_rows {
            self.draw_text_row(&mut out, view, y)?;
            queue!(out, Clear(ClearType::UntilNewLine), Print("\r\n"))?;
        }
        self.draw_status_bar(&mut out, view)?;
        self.draw_message_bar(&mut out, view)?;

        let cursor_x = view.rx.saturating_sub(view.col_off).min(self.cols.saturating_sub(1));
        let cursor_y = view.cursor.line.saturating_sub(view.row_off).min(self.text_rows.saturating_sub(1));
        queue!(out, MoveTo(cursor_x as u16, cursor_y as u16), Show)?;
        out.flush()?;
        Ok(())
    }

    fn draw_text_row(&self, out: &mut impl Write, view: &View, y: usize) -> Result<()> {
        let file_row = y + view.row_off;
        let Some(row) = view.buffer.row(file_row) else {
            if view.buffer.is_empty() && view.buffer.path().is_none() && y == self.text_rows / 3 {
                self.draw_welcome(out)?;
            } else {
                queue!(out, Print("~"))?;
            }
            return Ok(());
        };

        let render = row.render();
        let highlight = row.highlight();
        let span = view
            .selection
            .map(|sel| selected_visual_span(row, file_row, &sel, view.buffer.tab_stop()))
            .unwrap_or(None);

        let last = render.len().min(view.col_off + self.cols);
        let mut current_color: Option<Color> = None;
        let mut reversed = false;
        for vx in view.col_off..last {
            let selected = span.is_some_and(|(s, e)| vx >= s && vx < e);
            if selected != reversed {
                let attr = if selected { Attribute::Reverse } else { Attribute::NoReverse };
                queue!(out, SetAttribute(attr))?;
                reversed = selected;
            }
            let color = view.theme.color_for(highlight[vx]);
            if current_color != Some(color) {
                queue!(out, SetForegroundColor(color))?;
                current_color = Some(color);
            }
            let byte = render[vx];
            if byte.is_ascii_control() {
                // Control bytes render as printable placeholders so the
                // grid never receives a raw control character.
                let shown = if byte < 26 { (b'@' + byte) as char } else { '?' };
                queue!(out, SetAttribute(Attribute::Reverse), Print(shown), SetAttribute(Attribute::NoReverse))?;
                if reversed {
                    queue!(out, SetAttribute(Attribute::Reverse))?;
                }
            } else {
                queue!(out, Print(byte as char))?;
            }
        }
        if reversed {
            queue!(out, SetAttribute(Attribute::NoReverse))?;
        }
        queue!(out, ResetColor)?;
        Ok(())
    }

    fn draw_welcome(&self, out: &mut impl Write) -> Result<()> {
        let mut banner = format!("milo editor -- version {}", VERSION);
        clip_line(&mut banner, self.cols);
        let padding = (self.cols.saturating_sub(banner.len())) / 2;
        if padding > 0 {
            queue!(out, Print("~"))?;
            queue!(out, Print(" ".repeat(padding.saturating_sub(1))))?;
        }
        queue!(out, Print(banner))?;
        Ok(())
    }

    fn draw_status_bar(&self, out: &mut impl Write, view: &View) -> Result<()> {
        let name = view.buffer.file_name().unwrap_or("[No Name]");
        let modified = if view.buffer.is_dirty() { " (modified)" } else { "" };
        let mut left = format!(" {:.20} - {} lines{}", name, view.buffer.len(), modified);
        let filetype = view.buffer.syntax().map(|s| s.name).unwrap_or("no ft");
        let right = format!("{} | {}/{} ", filetype, view.cursor.line + 1, view.buffer.len());

        clip_line(&mut left, self.cols);
        let mut bar = left;
        if bar.len() + right.len() <= self.cols {
            bar.push_str(&" ".repeat(self.cols - bar.len() - right.len()));
            bar.push_str(&right);
        } else {
            bar.push_str(&" ".repeat(self.cols - bar.len()));
        }
        queue!(
            out,
            SetForegroundColor(view.theme.status_fg),
            SetBackgroundColor(view.theme.status_bg),
            Print(bar),
            ResetColor,
            Print("\r\n"),
        )?;
        Ok(())
    }

    fn draw_message_bar(&self, out: &mut impl Write, view: &View) -> Result<()> {
        queue!(out, Clear(ClearType::UntilNewLine))?;
        let mut msg = view.message.to_string();
        clip_line(&mut msg, self.cols);
        queue!(out, Print(msg))?;
        Ok(())
    }
}

/// Cut a line down to at most `max` bytes without splitting a multi-byte
/// character. `String::truncate` panics off a char boundary, so back up to
/// the nearest one.
fn clip_line(line: &mut String, max: usize) {
    if line.len() <= max {
        return;
    }
    let mut end = max;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    line.truncate(end);
}

/// Visual-cell span of the selection on one row, half-open.
///
/// The tail column is part of the selection, so the exclusive bound is
/// the visual column just past the tail character. Rows between head
/// and tail are selected end to end.
fn selected_visual_span(
    row: &Row,
    line: usize,
    sel: &Selection,
    tab_stop: usize,
) -> Option<(usize, usize)> {
    let sel = sel.canonical();
    let (start, end) = (sel.start(), sel.end());
    if line < start.line || line > end.line {
        return None;
    }
    let vstart = if line == start.line {
        row.visual_col(start.column.min(row.len()), tab_stop)
    } else {
        0
    };
    let vend = if line == end.line {
        if end.column >= row.len() {
            row.render().len()
        } else {
            row.visual_col(end.column + 1, tab_stop)
        }
    } else {
        row.render().len()
    };
    Some((vstart, vend.max(vstart)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_row(text: &[u8]) -> Buffer {
        let mut buffer = Buffer::new(8);
        buffer.insert_row(0, text);
        buffer
    }

    #[test]
    fn span_outside_selected_lines() {
        let buffer = single_row(b"hello");
        let r = buffer.row(0).unwrap();
        let sel = Selection::new(Cursor::at(1, 0), Cursor::at(2, 3));
        assert_eq!(selected_visual_span(r, 0, &sel, 8), None);
        assert_eq!(selected_visual_span(r, 3, &sel, 8), None);
    }

    #[test]
    fn span_interior_row_is_full_width() {
        let buffer = single_row(b"hello");
        let r = buffer.row(0).unwrap();
        let sel = Selection::new(Cursor::at(0, 2), Cursor::at(2, 1));
        assert_eq!(selected_visual_span(r, 1, &sel, 8), Some((0, 5)));
    }

    #[test]
    fn span_tail_column_inclusive() {
        let buffer = single_row(b"hello");
        let r = buffer.row(0).unwrap();
        let sel = Selection::new(Cursor::at(0, 1), Cursor::at(0, 3));
        assert_eq!(selected_visual_span(r, 0, &sel, 8), Some((1, 4)));
    }

    #[test]
    fn span_tab_tail_covers_whole_tab() {
        // "a\tb": tab occupies visual cells 1..8
        let buffer = single_row(b"a\tb");
        let r = buffer.row(0).unwrap();
        let sel = Selection::new(Cursor::at(0, 0), Cursor::at(0, 1));
        assert_eq!(selected_visual_span(r, 0, &sel, 8), Some((0, 8)));
    }

    #[test]
    fn span_reversed_selection_normalized() {
        let buffer = single_row(b"hello");
        let r = buffer.row(0).unwrap();
        let sel = Selection::new(Cursor::at(0, 3), Cursor::at(0, 1));
        assert_eq!(selected_visual_span(r, 0, &sel, 8), Some((1, 4)));
    }

    #[test]
    fn clip_line_backs_up_to_a_char_boundary() {
        let mut s = String::from("aéz");
        clip_line(&mut s, 2);
        assert_eq!(s, "a");

        let mut s = String::from("ééé");
        clip_line(&mut s, 3);
        assert_eq!(s, "é");

        let mut s = String::from("short");
        clip_line(&mut s, 10);
        assert_eq!(s, "short");
    }

    #[test]
    fn bars_clip_multibyte_text_on_a_narrow_screen() {
        let buffer = Buffer::new(8);
        let theme = crate::theme::Theme::from_name("dark");
        let view = View {
            buffer: &buffer,
            selection: None,
            theme: &theme,
            cursor: Cursor::new(),
            rx: 0,
            row_off: 0,
            col_off: 0,
            message: "ééé",
        };
        let screen = Screen {
            cols: 3,
            text_rows: 1,
        };
        let mut out = Vec::new();
        screen.draw_message_bar(&mut out, &view).unwrap();
        screen.draw_status_bar(&mut out, &view).unwrap();
    }
}
