//! Logger facade
//!
//! The producer-facing side of the pipeline. Every severity call is
//! fire-and-forget: it checks the minimum level, builds a record and tries to
//! enqueue it. Nothing is ever reported back to the caller.

use std::fmt;
use std::fs;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tokio::sync::oneshot;

use crate::config::LoggerConfig;
use crate::error::{Error, Result};
use crate::level::Level;
use crate::queue::{create_queue, RecordSender};
use crate::record::{Location, LogRecord};
use crate::rotation::{Clock, SystemClock};
use crate::stats::{Counters, LoggerStats};
use crate::writer::LogWriter;

/// Name of the background writer thread
pub const WRITER_THREAD_NAME: &str = "spoollog-writer";

/// Handle to the running writer thread
struct Worker {
    shutdown: oneshot::Sender<()>,
    thread: JoinHandle<()>,
}

/// Asynchronous file logger
///
/// Share it by reference or through an `Arc`; all methods take `&self`.
pub struct Logger {
    sender: RecordSender,
    level: AtomicU8,
    closed: AtomicBool,
    clock: Arc<dyn Clock>,
    counters: Arc<Counters>,
    worker: Mutex<Option<Worker>>,
}

impl Logger {
    /// Create a logger using the system clock
    ///
    /// Creates the log directory if needed, opens `<name>.log` and
    /// `<name>.log.wf`, and starts the writer thread.
    pub fn new(config: LoggerConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a logger reading time from `clock`
    pub fn with_clock(config: LoggerConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        fs::create_dir_all(&config.log_path).map_err(|source| Error::CreateDirectory {
            path: config.log_path.clone(),
            source,
        })?;

        let counters = Arc::new(Counters::default());
        let writer = LogWriter::open(&config, Arc::clone(&clock), Arc::clone(&counters))?;
        let (sender, receiver) = create_queue(config.log_chan_size, Arc::clone(&counters));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        // The writer gets its own single-threaded runtime so the logger works
        // with or without an ambient tokio runtime.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(Error::Runtime)?;

        let thread = thread::Builder::new()
            .name(WRITER_THREAD_NAME.to_string())
            .spawn(move || runtime.block_on(writer.run(receiver, shutdown_rx)))
            .map_err(Error::Runtime)?;

        Ok(Self {
            sender,
            level: AtomicU8::new(config.log_level as u8),
            closed: AtomicBool::new(false),
            clock,
            counters,
            worker: Mutex::new(Some(Worker {
                shutdown: shutdown_tx,
                thread,
            })),
        })
    }

    /// Current minimum severity
    pub fn level(&self) -> Level {
        Level::from(self.level.load(Ordering::Relaxed))
    }

    /// Change the minimum severity
    ///
    /// Raw indexes outside `0..=5` are clamped to [`Level::Debug`].
    pub fn set_level(&self, level: impl Into<Level>) {
        let level: Level = level.into();
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Check if a record at `level` would be queued
    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.level() && !self.is_closed()
    }

    /// Check if [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Log a message at `level`
    ///
    /// Does nothing if the level is below the minimum or the logger is closed.
    /// If the queue is full the record is dropped silently.
    pub fn log(&self, level: Level, location: &Location, args: fmt::Arguments<'_>) {
        if !self.is_enabled(level) {
            return;
        }

        let record = LogRecord::build(level, location, args, self.clock.now());
        let _ = self.sender.try_send(record);
    }

    /// Log at debug level
    pub fn debug(&self, location: &Location, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, location, args);
    }

    /// Log at trace level
    pub fn trace(&self, location: &Location, args: fmt::Arguments<'_>) {
        self.log(Level::Trace, location, args);
    }

    /// Log at info level
    pub fn info(&self, location: &Location, args: fmt::Arguments<'_>) {
        self.log(Level::Info, location, args);
    }

    /// Log at warn level
    pub fn warn(&self, location: &Location, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, location, args);
    }

    /// Log at error level
    pub fn error(&self, location: &Location, args: fmt::Arguments<'_>) {
        self.log(Level::Error, location, args);
    }

    /// Log at fatal level
    pub fn fatal(&self, location: &Location, args: fmt::Arguments<'_>) {
        self.log(Level::Fatal, location, args);
    }

    /// Snapshot of the pipeline counters
    pub fn stats(&self) -> LoggerStats {
        self.counters.snapshot(self.sender.len())
    }

    /// Stop logging and release both files
    ///
    /// Later log calls are ignored. Records already queued are written, then
    /// the files are flushed and closed and the writer thread is joined. Calling
    /// this more than once is harmless.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);

        let worker = match self.worker.lock() {
            Ok(mut worker) => worker.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(worker) = worker {
            // Ignore error if the writer already exited
            let _ = worker.shutdown.send(());
            if worker.thread.join().is_err() {
                tracing::error!("Log writer thread panicked");
            }
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("closed", &self.is_closed())
            .field("capacity", &self.sender.capacity())
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}
