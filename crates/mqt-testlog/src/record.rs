//! A single log record.

use std::fmt;

use chrono::NaiveDateTime;

/// Timestamp layout of the Odoo log header, e.g. `2020-01-01 00:00:00,000`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// One logical log entry.
///
/// Only `message` is always present: records opened by continuation lines
/// that precede any header, and synthetic records, carry no header fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub pid: Option<u32>,
    /// Level name as printed, e.g. `INFO` or `CRITICAL`.
    pub level: Option<String>,
    /// Database name; `None` when the server logged `?`.
    pub database: Option<String>,
    pub logger: Option<String>,
    /// Message text, continuation lines joined with `\n`.
    pub message: String,
}

impl LogRecord {
    /// A record holding only a message.
    pub fn synthetic(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Whether the record was logged at `level`.
    pub fn has_level(&self, level: &str) -> bool {
        self.level.as_deref() == Some(level)
    }

    pub(crate) fn append_line(&mut self, line: &str) {
        self.message.push('\n');
        self.message.push_str(line);
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
