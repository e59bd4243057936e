//! Logger configuration
//!
//! The resolved [`LoggerConfig`] can be built in code, from a string map using
//! the `log_*` keys, or from a TOML file with the same keys.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::level::Level;
use crate::queue::DEFAULT_CHANNEL_SIZE;
use crate::rotation::{RotationPolicy, SplitType, DEFAULT_SPLIT_SIZE};

/// Resolved logger configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Directory holding the log files
    pub log_path: PathBuf,

    /// Base file name; files are `<log_name>.log` and `<log_name>.log.wf`
    pub log_name: String,

    /// Minimum severity written
    pub log_level: Level,

    /// Queue capacity (default: 50000)
    pub log_chan_size: usize,

    /// Rotation trigger (default: hour)
    pub log_split_type: SplitType,

    /// Size threshold in bytes when splitting by size (default: 100 MiB)
    pub log_split_size: u64,

    /// Delete backups older than this many days after a rotation (0 = keep forever)
    pub log_keep_days: u64,
}

/// TOML shape of the configuration, before defaults are applied
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    log_path: Option<String>,
    log_name: Option<String>,
    log_level: Option<String>,
    log_chan_size: Option<usize>,
    log_split_type: Option<String>,
    log_split_size: Option<u64>,
    log_keep_days: Option<u64>,
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

fn split_type_from(value: Option<&str>) -> SplitType {
    match value {
        Some("size") => SplitType::Size,
        _ => SplitType::Hour,
    }
}

impl LoggerConfig {
    /// Create a configuration with default queue and rotation settings
    pub fn new(
        log_path: impl Into<PathBuf>,
        log_name: impl Into<String>,
        log_level: Level,
    ) -> Self {
        Self {
            log_path: log_path.into(),
            log_name: log_name.into(),
            log_level,
            log_chan_size: DEFAULT_CHANNEL_SIZE,
            log_split_type: SplitType::Hour,
            log_split_size: DEFAULT_SPLIT_SIZE,
            log_keep_days: 0,
        }
    }

    /// Set the queue capacity
    pub fn with_chan_size(mut self, size: usize) -> Self {
        self.log_chan_size = size;
        self
    }

    /// Rotate when the wall-clock hour changes
    pub fn with_split_by_hour(mut self) -> Self {
        self.log_split_type = SplitType::Hour;
        self
    }

    /// Rotate when a file grows past `bytes`
    pub fn with_split_by_size(mut self, bytes: u64) -> Self {
        self.log_split_type = SplitType::Size;
        self.log_split_size = bytes;
        self
    }

    /// Prune backups older than `days` after each rotation
    pub fn with_keep_days(mut self, days: u64) -> Self {
        self.log_keep_days = days;
        self
    }

    /// Build a configuration from string options
    ///
    /// `log_path`, `log_name` and `log_level` are required. Unknown levels fall
    /// back to `debug`, unparseable numbers fall back to their defaults, and any
    /// split type other than `"size"` means hourly rotation.
    pub fn from_map(options: &HashMap<String, String>) -> Result<Self> {
        let log_path = options.get("log_path").ok_or(Error::MissingKey("log_path"))?;
        let log_name = options.get("log_name").ok_or(Error::MissingKey("log_name"))?;
        let log_level = options
            .get("log_level")
            .ok_or(Error::MissingKey("log_level"))?;

        let log_chan_size = options
            .get("log_chan_size")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_CHANNEL_SIZE);

        let log_split_type = split_type_from(options.get("log_split_type").map(String::as_str));

        // Only consulted when splitting by size
        let log_split_size = match log_split_type {
            SplitType::Size => options
                .get("log_split_size")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_SPLIT_SIZE),
            SplitType::Hour => DEFAULT_SPLIT_SIZE,
        };

        let log_keep_days = options
            .get("log_keep_days")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);

        Ok(Self {
            log_path: expand_path(log_path),
            log_name: log_name.clone(),
            log_level: Level::parse_or_default(log_level),
            log_chan_size,
            log_split_type,
            log_split_size,
            log_keep_days,
        })
    }

    /// Parse a TOML document using the same keys as [`from_map`](Self::from_map)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawConfig =
            toml::from_str(content).map_err(|e| Error::InvalidConfig(e.to_string()))?;

        let log_path = raw.log_path.ok_or(Error::MissingKey("log_path"))?;
        let log_name = raw.log_name.ok_or(Error::MissingKey("log_name"))?;
        let log_level = raw.log_level.ok_or(Error::MissingKey("log_level"))?;

        let log_split_type = split_type_from(raw.log_split_type.as_deref());
        let log_split_size = match log_split_type {
            SplitType::Size => raw
                .log_split_size
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_SPLIT_SIZE),
            SplitType::Hour => DEFAULT_SPLIT_SIZE,
        };

        Ok(Self {
            log_path: expand_path(&log_path),
            log_name,
            log_level: Level::parse_or_default(&log_level),
            log_chan_size: raw.log_chan_size.unwrap_or(DEFAULT_CHANNEL_SIZE),
            log_split_type,
            log_split_size,
            log_keep_days: raw.log_keep_days.unwrap_or(0),
        })
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Rotation policy implied by the split settings
    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy::new(self.log_split_type, self.log_split_size)
    }

    /// Path of the primary log file
    pub fn log_file_path(&self) -> PathBuf {
        self.log_path.join(format!("{}.log", self.log_name))
    }

    /// Path of the warn/error/fatal log file
    pub fn warn_file_path(&self) -> PathBuf {
        self.log_path.join(format!("{}.log.wf", self.log_name))
    }
}
