//! Log records and caller locations
//!
//! A [`LogRecord`] is built once on the producer side, moved through the queue,
//! and consumed by the writer. Everything the writer needs is resolved up front so
//! the background worker never touches caller state.

use std::fmt::{self, Write as _};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::level::Level;

/// Timestamp pattern written at the start of every line
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Where a log call was made
///
/// Built by the [`location!`](crate::location) macro at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Source file as reported by `file!()`
    pub file: &'static str,
    /// Full path of the enclosing function
    pub function: &'static str,
    /// Line number
    pub line: u32,
}

impl Location {
    /// Create a location from its parts
    pub const fn new(file: &'static str, function: &'static str, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }

    /// File name without its directories
    pub fn file_basename(&self) -> &'static str {
        Path::new(self.file)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(self.file)
    }

    /// Last segment of the function path, skipping closure frames
    pub fn function_basename(&self) -> &'static str {
        self.function
            .rsplit("::")
            .find(|segment| !segment.is_empty() && *segment != "{{closure}}")
            .unwrap_or(self.function)
    }
}

/// A fully resolved log record, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Formatted message
    pub message: String,
    /// Timestamp formatted with [`TIME_FORMAT`]
    pub time: String,
    /// Severity of the record
    pub level: Level,
    /// Source file basename
    pub file: &'static str,
    /// Function basename
    pub function: &'static str,
    /// Line number
    pub line: u32,
    /// Route to the warn/fatal file instead of the primary one
    pub warn_and_fatal: bool,
}

impl LogRecord {
    /// Build a record from a severity, formatted arguments and the caller location
    ///
    /// Never fails. If a `Display` implementation inside `args` reports an error,
    /// whatever was formatted before the error is kept as the message.
    pub fn build(
        level: Level,
        location: &Location,
        args: fmt::Arguments<'_>,
        now: NaiveDateTime,
    ) -> Self {
        let message = match args.as_str() {
            Some(s) => s.to_string(),
            None => {
                let mut message = String::new();
                let _ = message.write_fmt(args);
                message
            }
        };

        Self {
            message,
            time: now.format(TIME_FORMAT).to_string(),
            level,
            file: location.file_basename(),
            function: location.function_basename(),
            line: location.line,
            warn_and_fatal: level.is_warn_or_above(),
        }
    }
}

/// Formats the record as a log line, without the trailing newline
impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}:{}:{}) {}",
            self.time,
            self.level.as_str(),
            self.file,
            self.function,
            self.line,
            self.message
        )
    }
}
