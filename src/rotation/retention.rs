//! Backup retention
//!
//! Deletes rotated backups older than a configured number of days. The active
//! `.log` and `.log.wf` files are never touched.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::error::Result;

/// Check whether `file_name` is a rotated backup of `log_name`
fn is_backup_of(file_name: &str, log_name: &str) -> bool {
    match file_name.strip_prefix(log_name) {
        Some(rest) => rest.starts_with(".log_") || rest.starts_with(".log.wf_"),
        None => false,
    }
}

/// Delete backups of `log_name` in `logs_dir` older than `keep_days` days
///
/// Returns the number of files deleted.
pub fn cleanup_backups(logs_dir: &Path, log_name: &str, keep_days: u64) -> Result<usize> {
    cleanup_backups_before(logs_dir, log_name, keep_days, SystemTime::now())
}

/// Same as [`cleanup_backups`], measuring age from `now`
pub(crate) fn cleanup_backups_before(
    logs_dir: &Path,
    log_name: &str,
    keep_days: u64,
    now: SystemTime,
) -> Result<usize> {
    if !logs_dir.exists() {
        return Ok(0);
    }

    let retention = Duration::from_secs(keep_days.saturating_mul(24 * 60 * 60));
    let cutoff = now.checked_sub(retention).unwrap_or(SystemTime::UNIX_EPOCH);

    let mut deleted_count = 0;

    for entry in fs::read_dir(logs_dir)? {
        let entry = entry?;
        let path = entry.path();

        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if is_backup_of(name, log_name) => {}
            _ => continue,
        }

        if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
            if modified < cutoff && fs::remove_file(&path).is_ok() {
                deleted_count += 1;
            }
        }
    }

    Ok(deleted_count)
}
