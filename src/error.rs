//! Error types for the file logger

use std::io;
use std::path::PathBuf;

/// Result type for logger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or starting a logger
///
/// Severity operations (`info`, `error`, ...) never return these; only
/// construction, configuration and maintenance calls do.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required configuration key was not supplied
    #[error("not found {0}")]
    MissingKey(&'static str),

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to create the log directory
    #[error("Failed to create log directory at {path}: {source}")]
    CreateDirectory {
        /// The directory that could not be created
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// Failed to open one of the log files at startup
    #[error("open file {path} failed, err: {source}")]
    OpenLog {
        /// The log file that could not be opened
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// The writer worker could not be started
    #[error("Failed to start log writer: {0}")]
    Runtime(#[source] io::Error),

    /// Other I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
