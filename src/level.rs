//! Log severities
//!
//! Severities are ordered `Debug < Trace < Info < Warn < Error < Fatal`. Note that
//! `Trace` ranks above `Debug` here, unlike the `tracing` crate.

use std::fmt;
use std::str::FromStr;

/// Log severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    #[default]
    Debug = 0,
    Trace = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    /// All severities, lowest first
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Trace,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Get the label written into log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    /// Get the lowercase configuration name
    pub fn name(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Trace => "trace",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }

    /// Check if records of this level belong in the warn/fatal file
    pub fn is_warn_or_above(&self) -> bool {
        matches!(self, Level::Warn | Level::Error | Level::Fatal)
    }

    /// Parse a configuration name, falling back to `Debug` for anything unrecognized
    ///
    /// Matching is case-sensitive: `"WARN"` yields `Debug`.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or(Level::Debug)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown level name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Level::Debug),
            "trace" => Ok(Level::Trace),
            "info" => Ok(Level::Info),
            "warn" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "fatal" => Ok(Level::Fatal),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}

/// Convert a raw index, clamping out-of-range values to `Debug`
impl From<u8> for Level {
    fn from(index: u8) -> Self {
        match index {
            1 => Level::Trace,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            5 => Level::Fatal,
            _ => Level::Debug,
        }
    }
}
