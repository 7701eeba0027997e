//! Logging infrastructure for milo.
//!
//! The terminal owns the screen while the editor runs, so log output
//! goes to a file only. Logging before `init` is a silent no-op.

use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert log level to string
    pub fn to_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

/// Global logger state
#[derive(Debug)]
struct Logger {
    /// Minimum log level to record
    min_level: LogLevel,
    /// Log file path
    file_path: PathBuf,
}

impl Logger {
    fn new(file_path: PathBuf, min_level: LogLevel) -> Self {
        // Create parent directory if it doesn't exist
        if let Some(parent) = file_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        // Clear log file on startup
        if let Ok(mut file) = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&file_path)
        {
            let _ = writeln!(file, "=== milo log start ===");
        }

        Self {
            min_level,
            file_path,
        }
    }

    fn write(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Local::now().format("%H:%M:%S").to_string();

        // Write to file (create if deleted)
        if let Ok(mut file) = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.file_path)
        {
            let _ = writeln!(file, "[{}] {}: {}", timestamp, level.to_str(), message);
        }
    }
}

/// Global logger instance that persists for the application lifetime.
static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

/// Initialize the global logger
///
/// Must be called once at application startup before any logging functions.
/// Subsequent calls will be ignored. Logging without initialization is
/// silently dropped.
///
/// # Arguments
///
/// * `file_path` - Path to the log file
/// * `min_level` - Minimum log level to record
pub fn init(file_path: PathBuf, min_level: LogLevel) {
    LOGGER.get_or_init(|| Mutex::new(Logger::new(file_path, min_level)));
}

fn log(level: LogLevel, message: String) {
    if let Some(logger) = LOGGER.get() {
        if let Ok(logger) = logger.lock() {
            logger.write(level, &message);
        }
    }
}

/// Log a debug message
pub fn debug(message: impl Into<String>) {
    log(LogLevel::Debug, message.into());
}

/// Log an informational message
pub fn info(message: impl Into<String>) {
    log(LogLevel::Info, message.into());
}

/// Log a warning message
pub fn warn(message: impl Into<String>) {
    log(LogLevel::Warn, message.into());
}

/// Log an error message
pub fn error(message: impl Into<String>) {
    log(LogLevel::Error, message.into());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn level_from_str_accepts_aliases() {
        assert_eq!(LogLevel::from_str("debug"), Ok(LogLevel::Debug));
        assert_eq!(LogLevel::from_str("INFO"), Ok(LogLevel::Info));
        assert_eq!(LogLevel::from_str("warning"), Ok(LogLevel::Warn));
        assert!(LogLevel::from_str("noisy").is_err());
    }

    #[test]
    fn log_before_init_is_noop() {
        // Must not panic even if init was never called in this process.
        debug("dropped");
    }
}
