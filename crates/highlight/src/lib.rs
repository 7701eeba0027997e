//! Syntax classification for milo.
//!
//! Classifies each rendered cell of a row into a semantic highlight token
//! with a single left-to-right scan. Block comments propagate across rows
//! through a per-row "still open" flag; the buffer drives that cascade.
//! Mapping tokens to terminal colors is the renderer's business, not ours.

mod profile;

pub use profile::{syntax_for_path, Syntax, SYNTAXES};

/// Semantic classification of one rendered cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    Normal,
    Comment,
    MultilineComment,
    String,
    Number,
    /// Primary keyword class (control flow, declarations).
    Keyword,
    /// Secondary keyword class (type names).
    Type,
    /// Search match overlay, never produced by the scanner itself.
    Match,
}

/// Token boundary characters: whitespace, NUL and a fixed punctuation set.
pub fn is_separator(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0 || b",.()+-/*=~%<>[];".contains(&byte)
}

/// Classify one rendered row.
///
/// `prev_open_comment` is the previous row's continuation flag (false for
/// the first row). Returns the per-cell classification and whether this row
/// ends inside an unterminated block comment.
pub fn highlight_line(
    render: &[u8],
    syntax: Option<&Syntax>,
    prev_open_comment: bool,
) -> (Vec<Highlight>, bool) {
    let mut hl = vec![Highlight::Normal; render.len()];

    let Some(syntax) = syntax else {
        return (hl, false);
    };

    let scs = syntax.line_comment.as_bytes();
    let (mcs, mce) = match syntax.block_comment {
        Some((start, end)) => (start.as_bytes(), end.as_bytes()),
        None => (&[][..], &[][..]),
    };

    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;
    let mut in_comment = prev_open_comment;

    let mut i = 0;
    while i < render.len() {
        let c = render[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        // Line comments win unless we are inside a string or block comment.
        if !scs.is_empty() && in_string.is_none() && !in_comment && render[i..].starts_with(scs) {
            for cell in &mut hl[i..] {
                *cell = Highlight::Comment;
            }
            break;
        }

        if !mcs.is_empty() && !mce.is_empty() && in_string.is_none() {
            if in_comment {
                if render[i..].starts_with(mce) {
                    for cell in &mut hl[i..i + mce.len()] {
                        *cell = Highlight::MultilineComment;
                    }
                    i += mce.len();
                    in_comment = false;
                    prev_sep = true;
                } else {
                    hl[i] = Highlight::MultilineComment;
                    i += 1;
                }
                continue;
            } else if render[i..].starts_with(mcs) {
                for cell in &mut hl[i..i + mcs.len()] {
                    *cell = Highlight::MultilineComment;
                }
                i += mcs.len();
                in_comment = true;
                continue;
            }
        }

        if syntax.highlight_strings {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                // A backslash escapes the next character.
                if c == b'\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if c == b'"' || c == b'\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if syntax.highlight_numbers
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == b'.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        // Keywords only start at a token boundary.
        if prev_sep {
            let mut matched = false;
            for keyword in syntax.keywords {
                let (word, class) = match keyword.strip_suffix('|') {
                    Some(word) => (word.as_bytes(), Highlight::Type),
                    None => (keyword.as_bytes(), Highlight::Keyword),
                };
                let after = i + word.len();
                // End of row counts as a boundary, like the original's NUL.
                let boundary = render.get(after).copied().map_or(true, is_separator);
                if render[i..].starts_with(word) && boundary {
                    for cell in &mut hl[i..after] {
                        *cell = class;
                    }
                    i = after;
                    matched = true;
                    break;
                }
            }
            if matched {
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    (hl, in_comment)
}
