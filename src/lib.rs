//! spoollog - asynchronous file logger with rotation
//!
//! Producers hand records to a bounded queue without ever blocking; a single
//! background writer appends them to `<name>.log`, or to `<name>.log.wf` for
//! warnings and above, rotating files by wall-clock hour or by size.
//!
//! ```no_run
//! use spoollog::{log_error, log_info, Level, Logger, LoggerConfig};
//!
//! let logger = Logger::new(LoggerConfig::new("/tmp/logs", "app", Level::Info))?;
//! log_info!(logger, "listening on port {}", 8080);
//! log_error!(logger, "request failed: {}", "timeout");
//! logger.close();
//! # Ok::<(), spoollog::Error>(())
//! ```

#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod level;
pub mod logger;
pub mod queue;
pub mod record;
pub mod rotation;
pub mod stats;
pub mod writer;

pub use config::LoggerConfig;
pub use error::{Error, Result};
pub use level::Level;
pub use logger::Logger;
pub use record::{Location, LogRecord};
pub use stats::LoggerStats;
