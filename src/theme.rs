//! Color themes for the editor screen.

use crossterm::style::Color;
use milo_highlight::Highlight;

/// Fixed palette mapping highlight classes and chrome to terminal colors.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub name: &'static str,
    pub text: Color,
    pub comment: Color,
    pub string: Color,
    pub number: Color,
    pub keyword: Color,
    pub type_name: Color,
    pub search_match: Color,
    pub status_fg: Color,
    pub status_bg: Color,
}

const DARK: Theme = Theme {
    name: "dark",
    text: Color::Reset,
    comment: Color::Cyan,
    string: Color::Magenta,
    number: Color::Red,
    keyword: Color::Yellow,
    type_name: Color::Green,
    search_match: Color::Blue,
    status_fg: Color::Black,
    status_bg: Color::Grey,
};

const LIGHT: Theme = Theme {
    name: "light",
    text: Color::Reset,
    comment: Color::DarkCyan,
    string: Color::DarkMagenta,
    number: Color::DarkRed,
    keyword: Color::DarkYellow,
    type_name: Color::DarkGreen,
    search_match: Color::DarkBlue,
    status_fg: Color::White,
    status_bg: Color::DarkGrey,
};

impl Theme {
    /// Look a theme up by its config name, falling back to dark.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => LIGHT,
            _ => DARK,
        }
    }

    /// Foreground color for a highlight class.
    pub fn color_for(&self, hl: Highlight) -> Color {
        match hl {
            Highlight::Normal => self.text,
            Highlight::Comment | Highlight::MultilineComment => self.comment,
            Highlight::String => self.string,
            Highlight::Number => self.number,
            Highlight::Keyword => self.keyword,
            Highlight::Type => self.type_name,
            Highlight::Match => self.search_match,
        }
    }
}
