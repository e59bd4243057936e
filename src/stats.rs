//! Pipeline counters
//!
//! Updated lock-free by producers (enqueue/drop) and by the writer worker
//! (writes/rotations). Read through [`Logger::stats`](crate::Logger::stats).

use std::sync::atomic::{AtomicU64, Ordering};

/// Shared counters behind [`LoggerStats`]
#[derive(Debug, Default)]
pub struct Counters {
    pub(crate) enqueued: AtomicU64,
    pub(crate) dropped: AtomicU64,
    pub(crate) written: AtomicU64,
    pub(crate) write_errors: AtomicU64,
    pub(crate) rotations: AtomicU64,
    pub(crate) rotation_failures: AtomicU64,
}

impl Counters {
    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot, combined with the current queue depth
    pub fn snapshot(&self, pending: usize) -> LoggerStats {
        LoggerStats {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            written: self.written.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
            rotations: self.rotations.load(Ordering::Relaxed),
            rotation_failures: self.rotation_failures.load(Ordering::Relaxed),
            pending,
        }
    }
}

/// Point-in-time view of the logger pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggerStats {
    /// Records accepted into the queue
    pub enqueued: u64,
    /// Records discarded because the queue was full or closed
    pub dropped: u64,
    /// Lines appended to a log file
    pub written: u64,
    /// Lines that failed to write
    pub write_errors: u64,
    /// Successful rotations across both files
    pub rotations: u64,
    /// Rotations that failed and will be retried
    pub rotation_failures: u64,
    /// Records waiting in the queue
    pub pending: usize,
}
