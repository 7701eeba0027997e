mod editor;
mod screen;
mod terminal;
mod theme;

use anyhow::Result;
use milo_config::{get_data_dir, Config};
use milo_logger::LogLevel;
use std::path::PathBuf;
use std::str::FromStr;

use editor::Editor;
use terminal::Terminal;

fn main() -> Result<()> {
    // Load config first; a missing or broken file falls back to defaults.
    let config = Config::load().unwrap_or_default();

    // Log to the configured file, defaulting to the XDG data directory.
    let log_path = config
        .logging
        .file_path
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| get_data_dir().ok().map(|dir| dir.join("milo.log")));
    if let Some(path) = log_path {
        let min_level =
            LogLevel::from_str(&config.logging.min_level).unwrap_or(LogLevel::Info);
        milo_logger::init(path, min_level);
    }

    let file = std::env::args().nth(1);

    let terminal = Terminal::new()?;
    let mut editor = Editor::new(terminal, &config)?;
    if let Some(path) = &file {
        editor.open(path)?;
    }
    let result = editor.run();

    // The terminal guard has restored the screen by now, so errors
    // print to a usable shell.
    drop(editor);
    if let Err(err) = result {
        milo_logger::error(format!("Fatal: {err:#}"));
        eprintln!("Error: {err:?}");
    }
    Ok(())
}
