//! Terminal input decoding for milo.
//!
//! Turns the raw bytes of one bounded-wait read into exactly one logical
//! key token. Escape sequences must arrive whole within a single read; an
//! unrecognized sequence decodes to plain [`Key::Esc`] rather than being
//! dropped. The read itself (poll with timeout) belongs to the caller.

const ESC: u8 = 0x1b;

/// Arrow direction, shared by the plain and modified arrow tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Up,
    Down,
    Left,
    Right,
}

/// One logical key, independent of how many raw bytes produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Printable byte (including tab) to be inserted literally.
    Char(u8),
    /// Control-modified letter, e.g. `Ctrl('q')`.
    Ctrl(char),
    Enter,
    Backspace,
    Esc,
    Arrow(Arrow),
    ShiftArrow(Arrow),
    CtrlArrow(Arrow),
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
}

fn arrow_for(letter: u8) -> Option<Arrow> {
    match letter {
        b'A' => Some(Arrow::Up),
        b'B' => Some(Arrow::Down),
        b'C' => Some(Arrow::Right),
        b'D' => Some(Arrow::Left),
        _ => None,
    }
}

fn single_byte(b: u8) -> Key {
    match b {
        b'\r' | b'\n' => Key::Enter,
        0x7f => Key::Backspace,
        b'\t' => Key::Char(b'\t'),
        0x01..=0x1a => Key::Ctrl((b'a' + b - 1) as char),
        // Remaining control bytes carry no command meaning here.
        0x00 | 0x1c..=0x1f => Key::Esc,
        _ => Key::Char(b),
    }
}

/// Decode the bytes of one read into one key token.
///
/// Returns `None` only for an empty slice (a timeout, which the caller
/// treats as "no event yet"). Every non-empty read yields exactly one key.
pub fn decode(bytes: &[u8]) -> Option<Key> {
    match *bytes {
        [] => None,
        [ESC] => Some(Key::Esc),
        // Shift- and control-modified arrows: ESC [ 1 ; 2 X / ESC [ 1 ; 5 X
        [ESC, b'[', b'1', b';', b'2', letter] => {
            Some(arrow_for(letter).map_or(Key::Esc, Key::ShiftArrow))
        }
        [ESC, b'[', b'1', b';', b'5', letter] => {
            Some(arrow_for(letter).map_or(Key::Esc, Key::CtrlArrow))
        }
        // Numeric-coded specials: ESC [ <digit> ~ ('1'/'7' and '4'/'8' are
        // home/end aliases used by some terminals)
        [ESC, b'[', digit @ b'0'..=b'9', b'~'] => Some(match digit {
            b'1' | b'7' => Key::Home,
            b'3' => Key::Delete,
            b'4' | b'8' => Key::End,
            b'5' => Key::PageUp,
            b'6' => Key::PageDown,
            _ => Key::Esc,
        }),
        [ESC, b'[', letter, ..] => Some(match letter {
            b'A' | b'B' | b'C' | b'D' => Key::Arrow(arrow_for(letter).unwrap_or(Arrow::Up)),
            b'H' => Key::Home,
            b'F' => Key::End,
            _ => Key::Esc,
        }),
        // Alternate home/end encoding: ESC O H / ESC O F
        [ESC, b'O', letter, ..] => Some(match letter {
            b'H' => Key::Home,
            b'F' => Key::End,
            _ => Key::Esc,
        }),
        [ESC, ..] => Some(Key::Esc),
        [b, ..] => Some(single_byte(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_read_is_no_event() {
        assert_eq!(decode(&[]), None);
    }

    #[test]
    fn printable_bytes_pass_through() {
        assert_eq!(decode(b"a"), Some(Key::Char(b'a')));
        assert_eq!(decode(b" "), Some(Key::Char(b' ')));
        assert_eq!(decode(b"\t"), Some(Key::Char(b'\t')));
    }

    #[test]
    fn control_bytes_map_to_fixed_codes() {
        assert_eq!(decode(&[0x11]), Some(Key::Ctrl('q')));
        assert_eq!(decode(&[0x13]), Some(Key::Ctrl('s')));
        assert_eq!(decode(b"\r"), Some(Key::Enter));
        assert_eq!(decode(&[0x7f]), Some(Key::Backspace));
    }

    #[test]
    fn lone_escape_is_escape() {
        assert_eq!(decode(&[0x1b]), Some(Key::Esc));
    }

    #[test]
    fn letter_sequences() {
        assert_eq!(decode(b"\x1b[A"), Some(Key::Arrow(Arrow::Up)));
        assert_eq!(decode(b"\x1b[B"), Some(Key::Arrow(Arrow::Down)));
        assert_eq!(decode(b"\x1b[C"), Some(Key::Arrow(Arrow::Right)));
        assert_eq!(decode(b"\x1b[D"), Some(Key::Arrow(Arrow::Left)));
        assert_eq!(decode(b"\x1b[H"), Some(Key::Home));
        assert_eq!(decode(b"\x1b[F"), Some(Key::End));
    }

    #[test]
    fn tilde_sequences_decode_in_one_call() {
        assert_eq!(decode(b"\x1b[3~"), Some(Key::Delete));
        assert_eq!(decode(b"\x1b[5~"), Some(Key::PageUp));
        assert_eq!(decode(b"\x1b[6~"), Some(Key::PageDown));
    }

    #[test]
    fn home_end_aliases() {
        assert_eq!(decode(b"\x1b[1~"), Some(Key::Home));
        assert_eq!(decode(b"\x1b[7~"), Some(Key::Home));
        assert_eq!(decode(b"\x1b[4~"), Some(Key::End));
        assert_eq!(decode(b"\x1b[8~"), Some(Key::End));
        assert_eq!(decode(b"\x1bOH"), Some(Key::Home));
        assert_eq!(decode(b"\x1bOF"), Some(Key::End));
    }

    #[test]
    fn modified_arrows() {
        assert_eq!(decode(b"\x1b[1;2C"), Some(Key::ShiftArrow(Arrow::Right)));
        assert_eq!(decode(b"\x1b[1;2A"), Some(Key::ShiftArrow(Arrow::Up)));
        assert_eq!(decode(b"\x1b[1;5D"), Some(Key::CtrlArrow(Arrow::Left)));
    }

    #[test]
    fn unknown_sequences_fall_back_to_escape() {
        assert_eq!(decode(b"\x1b[Z"), Some(Key::Esc));
        assert_eq!(decode(b"\x1b[9~"), Some(Key::Esc));
        assert_eq!(decode(b"\x1bx"), Some(Key::Esc));
        assert_eq!(decode(b"\x1b[1;9X"), Some(Key::Esc));
    }
}
