//! Configuration structures for milo settings.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Application configuration with nested sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General application settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Editor settings
    #[serde(default)]
    pub editor: EditorSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Color scheme name ("dark" or "light")
    #[serde(default = "default_theme_name")]
    pub theme: String,
}

/// Editor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Tab stop width in rendered cells
    #[serde(default = "default_tab_stop")]
    pub tab_stop: usize,

    /// How many times Ctrl-Q must be pressed to discard unsaved changes
    #[serde(default = "default_quit_confirm_times")]
    pub quit_confirm_times: u8,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log file path; the XDG data directory is used when unset
    #[serde(default)]
    pub file_path: Option<String>,

    /// Minimum log level (debug, info, warn, error)
    #[serde(default = "default_min_level")]
    pub min_level: String,
}

// Default value functions for serde
fn default_theme_name() -> String {
    defaults::THEME_NAME.to_string()
}

fn default_tab_stop() -> usize {
    defaults::TAB_STOP
}

fn default_quit_confirm_times() -> u8 {
    defaults::QUIT_CONFIRM_TIMES
}

fn default_min_level() -> String {
    defaults::MIN_LOG_LEVEL.to_string()
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
        }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_stop: default_tab_stop(),
            quit_confirm_times: default_quit_confirm_times(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_path: None,
            min_level: default_min_level(),
        }
    }
}
