//! Bounded record queue
//!
//! A fixed-capacity FIFO between any number of producers and the single writer.
//! Sending never blocks: when the queue is full the record is dropped and counted.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::record::LogRecord;
use crate::stats::Counters;

/// Default queue capacity
pub const DEFAULT_CHANNEL_SIZE: usize = 50_000;

/// Producer half of the record queue
#[derive(Debug, Clone)]
pub struct RecordSender {
    tx: mpsc::Sender<LogRecord>,
    counters: Arc<Counters>,
}

/// Consumer half of the record queue
#[derive(Debug)]
pub struct RecordReceiver {
    rx: mpsc::Receiver<LogRecord>,
}

/// Create a bounded queue for log records
///
/// # Arguments
/// * `capacity` - Maximum number of buffered records; raised to 1 if zero
/// * `counters` - Shared counters updated on every send attempt
pub fn create_queue(capacity: usize, counters: Arc<Counters>) -> (RecordSender, RecordReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (RecordSender { tx, counters }, RecordReceiver { rx })
}

impl RecordSender {
    /// Try to enqueue a record without blocking
    ///
    /// Returns `false` if the record was dropped because the queue is full or
    /// has been closed.
    pub fn try_send(&self, record: LogRecord) -> bool {
        match self.tx.try_send(record) {
            Ok(()) => {
                Counters::incr(&self.counters.enqueued);
                true
            }
            Err(mpsc::error::TrySendError::Full(_)) | Err(mpsc::error::TrySendError::Closed(_)) => {
                Counters::incr(&self.counters.dropped);
                false
            }
        }
    }

    /// Number of records currently buffered
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Check if no records are buffered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed capacity chosen at construction
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Check if the consumer has closed the queue
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl RecordReceiver {
    /// Wait for the next record
    ///
    /// Returns `None` once the queue is closed (or every sender is gone) and all
    /// buffered records have been received.
    pub async fn recv(&mut self) -> Option<LogRecord> {
        self.rx.recv().await
    }

    /// Take the next record if one is immediately available
    pub fn try_recv(&mut self) -> Option<LogRecord> {
        self.rx.try_recv().ok()
    }

    /// Close the queue
    ///
    /// Further sends fail; records already buffered can still be received.
    pub fn close(&mut self) {
        self.rx.close();
    }
}
