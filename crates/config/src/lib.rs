//! Configuration management for milo.
//!
//! TOML configuration loaded from the XDG config directory, with every key
//! optional and defaulted so a partial file keeps working.

mod settings;
mod xdg;

pub use settings::{Config, EditorSettings, GeneralSettings, LoggingSettings};
pub use xdg::{get_config_dir, get_data_dir};

use anyhow::Result;
use std::path::PathBuf;

/// Default values as constants
pub mod defaults {
    pub const THEME_NAME: &str = "dark";
    pub const TAB_STOP: usize = 8;
    pub const QUIT_CONFIRM_TIMES: u8 = 3;
    pub const MIN_LOG_LEVEL: &str = "info";
}

impl Config {
    /// Load configuration from file.
    ///
    /// On first run, creates the config file with default values.
    /// Missing keys fall back to their defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content)?)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Get path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(get_config_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.editor.tab_stop, defaults::TAB_STOP);
        assert_eq!(config.editor.quit_confirm_times, defaults::QUIT_CONFIRM_TIMES);
        assert_eq!(config.general.theme, defaults::THEME_NAME);
    }

    #[test]
    fn partial_file_fills_missing_keys() {
        let config: Config = toml::from_str("[editor]\ntab_stop = 4\n").unwrap();
        assert_eq!(config.editor.tab_stop, 4);
        assert_eq!(config.general.theme, defaults::THEME_NAME);
        assert_eq!(config.logging.min_level, defaults::MIN_LOG_LEVEL);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.editor.tab_stop, config.editor.tab_stop);
    }
}
