//! Static language profiles.
//!
//! A profile is immutable and shared; the editor selects one per file by
//! extension and swaps it wholesale, never mutating it in place.

use std::path::Path;

/// Language profile: the rule set used to classify one file's content.
///
/// Keywords ending in `|` belong to the secondary (type-like) class; the
/// marker is stripped before comparison.
#[derive(Debug)]
pub struct Syntax {
    /// Display name shown in the status bar.
    pub name: &'static str,
    /// File extensions (with leading dot) this profile applies to.
    pub extensions: &'static [&'static str],
    pub keywords: &'static [&'static str],
    /// Single-line comment marker, empty when the language has none.
    pub line_comment: &'static str,
    /// Block comment start/end markers.
    pub block_comment: Option<(&'static str, &'static str)>,
    pub highlight_numbers: bool,
    pub highlight_strings: bool,
}

pub const SYNTAXES: &[Syntax] = &[
    Syntax {
        name: "c",
        extensions: &[".c", ".h", ".cpp", ".hpp", ".cc"],
        keywords: &[
            "auto", "break", "case", "continue", "default", "do", "else", "extern", "for", "goto",
            "if", "register", "return", "sizeof", "static", "switch", "typedef", "union",
            "volatile", "while", "NULL", "#define", "#include",
            "int|", "long|", "double|", "float|", "char|", "unsigned|", "signed|", "void|",
            "const|", "enum|", "struct|",
        ],
        line_comment: "//",
        block_comment: Some(("/*", "*/")),
        highlight_numbers: true,
        highlight_strings: true,
    },
    Syntax {
        name: "rust",
        extensions: &[".rs"],
        keywords: &[
            "as", "break", "const", "continue", "crate", "dyn", "else", "extern", "fn", "for",
            "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
            "return", "self", "static", "super", "trait", "unsafe", "use", "where", "while",
            "bool|", "char|", "enum|", "f32|", "f64|", "i8|", "i16|", "i32|", "i64|", "isize|",
            "str|", "struct|", "u8|", "u16|", "u32|", "u64|", "usize|", "String|", "Vec|",
            "Option|", "Result|",
        ],
        line_comment: "//",
        block_comment: Some(("/*", "*/")),
        highlight_numbers: true,
        highlight_strings: true,
    },
];

/// Find the profile matching a file's extension, if any.
pub fn syntax_for_path(path: &Path) -> Option<&'static Syntax> {
    let name = path.file_name()?.to_str()?;
    let dot = name.rfind('.')?;
    let ext = &name[dot..];
    SYNTAXES
        .iter()
        .find(|s| s.extensions.iter().any(|e| *e == ext))
}
