//! File rotation
//!
//! Decides when the active log file must be moved aside (hour boundary or size
//! threshold), performs the move, and optionally prunes old backups.

mod clock;
mod policy;
mod retention;
mod sink;

pub use clock::{Clock, ManualClock, SystemClock};
pub use policy::{HourKey, RotationPolicy, SplitType, DEFAULT_SPLIT_SIZE};
pub use retention::cleanup_backups;
pub(crate) use retention::cleanup_backups_before;
pub use sink::{FileSink, RotationOutcome};
