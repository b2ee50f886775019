//! Load progress logging.
//!
//! Progress lines are [`LogEntry`] values. Each one is emitted as a
//! `tracing` event when it is produced; the loader also keeps the lines of a
//! batch on its [`crate::IngestReport`] so callers can show or serialize them.

use serde::Serialize;

/// Log level of a progress entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single progress line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth (0 for batch-level lines)
    pub indent: u8,
}

impl LogEntry {
    fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            indent: 0,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Send this entry to the `tracing` subscriber.
    pub fn emit(&self) {
        let indent = self.indent;
        match self.level {
            LogLevel::Info => tracing::info!(indent, "{}", self.message),
            LogLevel::Success => tracing::info!(indent, success = true, "{}", self.message),
            LogLevel::Warning => tracing::warn!(indent, "{}", self.message),
            LogLevel::Error => tracing::error!(indent, "{}", self.message),
        }
    }
}

pub fn log_info(msg: impl Into<String>) {
    LogEntry::info(msg).emit();
}

pub fn log_error(msg: impl Into<String>) {
    LogEntry::error(msg).emit();
}
