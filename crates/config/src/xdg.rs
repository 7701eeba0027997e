//! XDG Base Directory support for milo.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "milo";

/// Get the configuration directory following XDG conventions.
///
/// Returns `$XDG_CONFIG_HOME/milo` or `~/.config/milo`.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME))
        .context("Failed to determine config directory")
}

/// Get the data directory following XDG conventions.
///
/// Returns `$XDG_DATA_HOME/milo` or `~/.local/share/milo`.
pub fn get_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|p| p.join(APP_NAME))
        .context("Failed to determine data directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_is_app_scoped() {
        let dir = get_config_dir().unwrap();
        assert!(dir.ends_with("milo"));
    }

    #[test]
    fn data_dir_is_app_scoped() {
        let dir = get_data_dir().unwrap();
        assert!(dir.ends_with("milo"));
    }

    #[test]
    fn config_and_data_dirs_differ() {
        let config = get_config_dir().unwrap();
        let data = get_data_dir().unwrap();
        assert_ne!(config, data);
    }
}
