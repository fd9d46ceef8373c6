//! Console logger implementation

use super::traits::Logger;

/// Minimum level a `ConsoleLogger` prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConsoleLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// A logger that writes to stderr
///
/// Stdout is reserved for tool output (the CLI prints results there), so
/// every level goes to stderr.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    min_level: ConsoleLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    /// Create a new console logger with default prefix, printing info and above
    pub fn new() -> Self {
        Self {
            prefix: "[hass-tools]".to_string(),
            min_level: ConsoleLevel::Info,
        }
    }

    /// Create a console logger with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::new()
        }
    }

    /// Set the minimum level
    pub fn with_level(mut self, level: ConsoleLevel) -> Self {
        self.min_level = level;
        self
    }

    fn emit(&self, level: ConsoleLevel, tag: &str, message: &str) {
        if level >= self.min_level {
            eprintln!("{} {}: {}", self.prefix, tag, message);
        }
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        self.emit(ConsoleLevel::Debug, "DEBUG", message);
    }

    fn info(&self, message: &str) {
        self.emit(ConsoleLevel::Info, "INFO", message);
    }

    fn warn(&self, message: &str) {
        self.emit(ConsoleLevel::Warn, "WARN", message);
    }

    fn error(&self, message: &str) {
        self.emit(ConsoleLevel::Error, "ERROR", message);
    }
}
