//! Log text to records.
//!
//! Header lines look like
//! ```text
//! 2020-01-01 00:00:00,000 4242 INFO testdb odoo.modules.loading: Modules loaded.
//! ```
//! Any other line continues the previous record.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use mqt_fs::{NormalizedPath, io};
use regex::Regex;

use crate::error::{Error, Result};
use crate::record::{LogRecord, TIMESTAMP_FORMAT};

/// Terminal color escapes, e.g. `ESC[1;31m` or `ESC[0m`.
static COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B\[([0-9]{1,2}(;[0-9]{1,2})?)?[m|K]").expect("Invalid color regex")
});

/// Marker the server prints instead of a database name.
const NO_DATABASE: &str = "?";

/// Strip terminal color escapes from a line.
pub fn strip_colors(line: &str) -> std::borrow::Cow<'_, str> {
    COLOR_REGEX.replace_all(line, "")
}

/// Splits a log into [`LogRecord`]s for one database.
#[derive(Debug, Clone)]
pub struct LogParser {
    header: Regex,
}

impl LogParser {
    /// Parser accepting headers for `database` or for no database (`?`).
    pub fn new(database: &str) -> Result<Self> {
        let pattern = format!(
            concat!(
                r"^(?P<timestamp>\d{{4}}-\d{{2}}-\d{{2}} \d{{2}}:\d{{2}}:\d{{2}},\d{{3}}) ",
                r"(?P<pid>\d+) (?P<level>\w+) (?P<db>{}|\?) (?P<logger>\S+): (?P<message>.*)$",
            ),
            regex::escape(database)
        );
        let header = Regex::new(&pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        Ok(Self { header })
    }

    /// Parse a header line, or `None` for a continuation line.
    pub fn parse_header(&self, line: &str) -> Option<LogRecord> {
        let caps = self.header.captures(line)?;
        let field = |name: &str| caps.name(name).map(|m| m.as_str().to_string());

        let timestamp = caps
            .name("timestamp")
            .and_then(|m| NaiveDateTime::parse_from_str(m.as_str(), TIMESTAMP_FORMAT).ok());
        let pid = caps.name("pid").and_then(|m| m.as_str().parse().ok());
        let database = field("db").filter(|db| db != NO_DATABASE);

        Some(LogRecord {
            timestamp,
            pid,
            level: field("level"),
            database,
            logger: field("logger"),
            message: field("message").unwrap_or_default(),
        })
    }

    /// Parse log text.
    pub fn parse(&self, text: &str) -> Vec<LogRecord> {
        let mut records: Vec<LogRecord> = Vec::new();

        for raw in text.lines() {
            let line = strip_colors(raw);
            if let Some(record) = self.parse_header(&line) {
                records.push(record);
                continue;
            }
            match records.last_mut() {
                Some(open) => open.append_line(&line),
                None => {
                    tracing::trace!("Continuation line before any header");
                    records.push(LogRecord::synthetic(line.into_owned()));
                }
            }
        }

        tracing::debug!(records = records.len(), "Parsed log");
        records
    }

    /// Read and parse a log file.
    ///
    /// Bytes that are not valid UTF-8 are replaced, as test output may echo
    /// data in any encoding.
    pub fn parse_file(&self, path: &NormalizedPath) -> Result<Vec<LogRecord>> {
        let text = io::read_text_lossy(path)?;
        Ok(self.parse(&text))
    }
}
