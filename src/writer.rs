//! Background writer
//!
//! The single consumer of the record queue. It owns both log files, so rotation
//! and writes never race with each other.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{Local, NaiveDateTime, TimeZone};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::config::LoggerConfig;
use crate::error::Result;
use crate::queue::RecordReceiver;
use crate::record::LogRecord;
use crate::rotation::{cleanup_backups_before, Clock, FileSink, RotationOutcome, RotationPolicy};
use crate::stats::Counters;

/// Records handled before buffered lines are flushed, even if more are waiting
const MAX_BATCH: usize = 512;

/// Delete backups older than `keep_days`, measured from the writer's clock
fn remove_expired_backups(log_dir: &Path, log_name: &str, keep_days: u64, now: NaiveDateTime) {
    // Local times skipped by a DST jump fall back to the system time
    let now = Local
        .from_local_datetime(&now)
        .earliest()
        .map(SystemTime::from)
        .unwrap_or_else(SystemTime::now);

    match cleanup_backups_before(log_dir, log_name, keep_days, now) {
        Ok(count) if count > 0 => debug!("Removed {} expired log backups", count),
        Ok(_) => {}
        Err(e) => warn!("Failed to clean up log backups: {}", e),
    }
}

/// Owner of the primary and warn/fatal files
pub struct LogWriter {
    primary: FileSink,
    warn: FileSink,
    policy: RotationPolicy,
    clock: Arc<dyn Clock>,
    counters: Arc<Counters>,
    log_dir: PathBuf,
    log_name: String,
    keep_days: u64,
}

impl LogWriter {
    /// Open both log files described by `config`
    ///
    /// Fails if either file cannot be opened; nothing is left half-open.
    pub fn open(
        config: &LoggerConfig,
        clock: Arc<dyn Clock>,
        counters: Arc<Counters>,
    ) -> Result<Self> {
        let now = clock.now();
        let primary = FileSink::open(config.log_file_path(), now)?;
        let warn = FileSink::open(config.warn_file_path(), now)?;

        Ok(Self {
            primary,
            warn,
            policy: config.rotation_policy(),
            clock,
            counters,
            log_dir: config.log_path.clone(),
            log_name: config.log_name.clone(),
            keep_days: config.log_keep_days,
        })
    }

    /// Rotate if needed, then append the record to its file
    pub fn write(&mut self, record: &LogRecord) {
        let now = self.clock.now();
        let sink = if record.warn_and_fatal {
            &mut self.warn
        } else {
            &mut self.primary
        };

        match sink.check_rotation(&self.policy, now) {
            RotationOutcome::NotNeeded => {}
            RotationOutcome::Rotated { backup } => {
                Counters::incr(&self.counters.rotations);
                debug!(
                    path = %sink.path().display(),
                    backup = ?backup,
                    "Rotated log file"
                );

                if self.keep_days > 0 {
                    remove_expired_backups(&self.log_dir, &self.log_name, self.keep_days, now);
                }
            }
            RotationOutcome::Failed(e) => {
                Counters::incr(&self.counters.rotation_failures);
                warn!(
                    path = %sink.path().display(),
                    "Log rotation failed, keeping current file: {}",
                    e
                );
            }
        }

        match sink.write_record(record) {
            Ok(()) => Counters::incr(&self.counters.written),
            Err(e) => {
                Counters::incr(&self.counters.write_errors);
                warn!(path = %sink.path().display(), "Failed to write log line: {}", e);
            }
        }
    }

    /// Flush both files
    pub fn flush(&mut self) {
        for sink in [&mut self.primary, &mut self.warn] {
            if let Err(e) = sink.flush() {
                warn!(path = %sink.path().display(), "Failed to flush log file: {}", e);
            }
        }
    }

    /// Drain the queue until shutdown
    ///
    /// Exits when `shutdown` fires (or its sender is dropped) after writing every
    /// record still buffered, or when all senders are gone and the queue is empty.
    /// Both files are flushed and closed on exit.
    pub async fn run(mut self, mut rx: RecordReceiver, mut shutdown: oneshot::Receiver<()>) {
        debug!(
            primary = %self.primary.path().display(),
            warn = %self.warn.path().display(),
            "Log writer started"
        );

        loop {
            tokio::select! {
                record = rx.recv() => match record {
                    Some(record) => {
                        self.write(&record);
                        for _ in 1..MAX_BATCH {
                            match rx.try_recv() {
                                Some(record) => self.write(&record),
                                None => break,
                            }
                        }
                        self.flush();
                    }
                    None => break,
                },
                _ = &mut shutdown => {
                    rx.close();
                    while let Some(record) = rx.recv().await {
                        self.write(&record);
                    }
                    break;
                }
            }
        }

        self.flush();
        debug!("Log writer stopped");
    }
}
