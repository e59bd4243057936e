//! Rotation decisions
//!
//! Pure functions of the current time and file size; the file juggling lives in
//! [`FileSink`](super::FileSink).

use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// Default size threshold for [`SplitType::Size`] (100 MiB)
pub const DEFAULT_SPLIT_SIZE: u64 = 100 * 1024 * 1024;

/// How log files are split, as named in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SplitType {
    /// Rotate when the wall-clock hour changes
    #[default]
    Hour,
    /// Rotate when the file grows past a threshold
    Size,
}

/// Date and hour of a rotation check
///
/// Compared as a whole so that the same hour on a different day still counts as
/// a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourKey {
    date: NaiveDate,
    hour: u32,
}

impl HourKey {
    /// Key for the hour containing `now`
    pub fn of(now: NaiveDateTime) -> Self {
        Self {
            date: now.date(),
            hour: now.hour(),
        }
    }
}

/// When the active file must be rotated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationPolicy {
    /// Rotate on the first write of a new date-hour
    ByHour,
    /// Rotate on the first write after the file exceeds `threshold` bytes
    BySize { threshold: u64 },
}

impl RotationPolicy {
    /// Build a policy from the configured split type and size
    ///
    /// A zero threshold falls back to [`DEFAULT_SPLIT_SIZE`].
    pub fn new(split_type: SplitType, split_size: u64) -> Self {
        match split_type {
            SplitType::Hour => RotationPolicy::ByHour,
            SplitType::Size => RotationPolicy::BySize {
                threshold: if split_size == 0 {
                    DEFAULT_SPLIT_SIZE
                } else {
                    split_size
                },
            },
        }
    }

    /// Decide whether a file must be rotated before the next write
    ///
    /// # Arguments
    /// * `last_hour` - Key stored at the file's last hour check
    /// * `now` - Current wall-clock time
    /// * `size` - Current size of the file in bytes
    pub fn should_rotate(&self, last_hour: HourKey, now: NaiveDateTime, size: u64) -> bool {
        match self {
            RotationPolicy::ByHour => HourKey::of(now) != last_hour,
            RotationPolicy::BySize { threshold } => size > *threshold,
        }
    }

    /// Suffix appended to the backup file name (after an underscore)
    pub fn backup_suffix(&self, now: NaiveDateTime) -> String {
        match self {
            RotationPolicy::ByHour => now.format("%Y%m%d%H").to_string(),
            RotationPolicy::BySize { .. } => now.format("%Y%m%d%H%M%S").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, min, sec)
            .unwrap()
    }

    #[test]
    fn test_hour_policy_same_hour_keeps_file() {
        let policy = RotationPolicy::ByHour;
        let last = HourKey::of(at(5, 14, 0, 0));
        assert!(!policy.should_rotate(last, at(5, 14, 59, 59), 0));
    }

    #[test]
    fn test_hour_policy_next_hour_rotates() {
        let policy = RotationPolicy::ByHour;
        let last = HourKey::of(at(5, 14, 0, 0));
        assert!(policy.should_rotate(last, at(5, 15, 0, 0), 0));
    }

    #[test]
    fn test_hour_policy_same_hour_next_day_rotates() {
        let policy = RotationPolicy::ByHour;
        let last = HourKey::of(at(5, 3, 10, 0));
        assert!(policy.should_rotate(last, at(6, 3, 10, 0), 0));
    }

    #[test]
    fn test_size_policy_threshold_is_exclusive() {
        let policy = RotationPolicy::new(SplitType::Size, 100);
        let last = HourKey::of(at(5, 14, 0, 0));
        assert!(!policy.should_rotate(last, at(5, 14, 0, 0), 99));
        assert!(!policy.should_rotate(last, at(5, 14, 0, 0), 100));
        assert!(policy.should_rotate(last, at(5, 14, 0, 0), 101));
    }

    #[test]
    fn test_size_policy_ignores_hour_change() {
        let policy = RotationPolicy::new(SplitType::Size, 100);
        let last = HourKey::of(at(5, 14, 0, 0));
        assert!(!policy.should_rotate(last, at(5, 18, 0, 0), 10));
    }

    #[test]
    fn test_zero_threshold_uses_default() {
        assert_eq!(
            RotationPolicy::new(SplitType::Size, 0),
            RotationPolicy::BySize {
                threshold: DEFAULT_SPLIT_SIZE
            }
        );
    }

    #[test]
    fn test_backup_suffixes() {
        let now = at(5, 7, 8, 9);
        assert_eq!(RotationPolicy::ByHour.backup_suffix(now), "2026030507");
        assert_eq!(
            RotationPolicy::BySize { threshold: 1 }.backup_suffix(now),
            "20260305070809"
        );
    }
}
