//! A single managed log file
//!
//! A [`FileSink`] owns the handle for one canonical path (`app.log` or
//! `app.log.wf`) together with its rotation state. Only the writer worker holds
//! sinks, so rotation needs no locking.

use std::fmt::Write as _;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::policy::{HourKey, RotationPolicy};
use crate::error::{Error, Result};
use crate::record::LogRecord;

/// Result of a rotation check
#[derive(Debug)]
pub enum RotationOutcome {
    /// The active file stays as it is
    NotNeeded,
    /// A fresh file is now open at the canonical path
    Rotated {
        /// Where the previous file was moved, if it was still present
        backup: Option<PathBuf>,
    },
    /// Rotation failed; the previous handle is still in use and the next
    /// check will try again
    Failed(io::Error),
}

/// One log file with its handle and rotation state
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
    size: u64,
    last_hour: HourKey,
    line: String,
}

/// Open a log file for appending, creating it if needed
fn open_append(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    options.open(path)
}

/// Pick a backup path that does not exist yet
///
/// Two rotations in the same second (or the same hour after a clock step back)
/// would otherwise overwrite an earlier backup.
fn unique_backup_path(base: PathBuf) -> PathBuf {
    if !base.exists() {
        return base;
    }

    let mut n = 1;
    loop {
        let mut candidate = base.clone().into_os_string();
        candidate.push(format!(".{}", n));
        let candidate = PathBuf::from(candidate);
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

impl FileSink {
    /// Open the sink at `path`
    ///
    /// The hour key starts at the hour of `now`, so a freshly opened sink does
    /// not rotate until the hour changes.
    pub fn open(path: PathBuf, now: NaiveDateTime) -> Result<Self> {
        let file = open_append(&path).map_err(|source| Error::OpenLog {
            path: path.clone(),
            source,
        })?;
        let size = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            size,
            last_hour: HourKey::of(now),
            line: String::new(),
        })
    }

    /// Canonical path of the active file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes in the active file, including buffered writes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Run the rotation policy before a write
    pub fn check_rotation(
        &mut self,
        policy: &RotationPolicy,
        now: NaiveDateTime,
    ) -> RotationOutcome {
        if !policy.should_rotate(self.last_hour, now, self.size) {
            return RotationOutcome::NotNeeded;
        }

        let mut backup = self.path.clone().into_os_string();
        backup.push("_");
        backup.push(policy.backup_suffix(now));
        let backup = unique_backup_path(PathBuf::from(backup));

        match self.rotate(&backup) {
            Ok(moved) => {
                if let RotationPolicy::ByHour = policy {
                    self.last_hour = HourKey::of(now);
                }
                RotationOutcome::Rotated {
                    backup: moved.then_some(backup),
                }
            }
            Err(e) => RotationOutcome::Failed(e),
        }
    }

    /// Move the active file aside and open a fresh one
    ///
    /// Returns whether a file was moved. The current handle is only replaced once
    /// the new file is open, so a failure at any step leaves a usable handle.
    fn rotate(&mut self, backup: &Path) -> io::Result<bool> {
        self.writer.flush()?;

        // A previous attempt may have moved the file already
        let moved = if self.path.exists() {
            fs::rename(&self.path, backup)?;
            true
        } else {
            false
        };

        let file = open_append(&self.path)?;
        self.size = file.metadata().map(|m| m.len()).unwrap_or(0);
        self.writer = BufWriter::new(file);
        Ok(moved)
    }

    /// Append one formatted record line
    pub fn write_record(&mut self, record: &LogRecord) -> io::Result<()> {
        self.line.clear();
        let _ = writeln!(self.line, "{}", record);
        self.writer.write_all(self.line.as_bytes())?;
        self.size += self.line.len() as u64;
        Ok(())
    }

    /// Flush buffered lines to the file
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::record::Location;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 21)
            .unwrap()
            .and_hms_opt(hour, min, sec)
            .unwrap()
    }

    fn record(message: &str, now: NaiveDateTime) -> LogRecord {
        LogRecord::build(
            Level::Info,
            &Location::new("sink.rs", "tests::record", 10),
            format_args!("{}", message),
            now,
        )
    }

    fn write(sink: &mut FileSink, policy: &RotationPolicy, message: &str, now: NaiveDateTime) {
        sink.check_rotation(policy, now);
        sink.write_record(&record(message, now)).unwrap();
    }

    #[test]
    fn test_open_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let sink = FileSink::open(path.clone(), at(10, 0, 0)).unwrap();
        assert!(path.exists());
        assert_eq!(sink.size(), 0);
        assert_eq!(sink.path(), path.as_path());
    }

    #[test]
    fn test_open_appends_to_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");
        fs::write(&path, "existing line\n").unwrap();

        let mut sink = FileSink::open(path.clone(), at(10, 0, 0)).unwrap();
        assert_eq!(sink.size(), 14);

        sink.write_record(&record("new", at(10, 0, 1))).unwrap();
        sink.flush().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("existing line\n"));
        assert!(content.ends_with(" INFO (sink.rs:record:10) new\n"));
    }

    #[test]
    fn test_open_fails_in_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("app.log");

        let err = FileSink::open(path, at(10, 0, 0)).unwrap_err();
        assert!(matches!(err, Error::OpenLog { .. }));
    }

    #[test]
    fn test_hour_rotation_across_boundary() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");
        let policy = RotationPolicy::ByHour;

        let mut sink = FileSink::open(path.clone(), at(13, 30, 0)).unwrap();
        write(&mut sink, &policy, "before boundary", at(13, 59, 59));

        let outcome = sink.check_rotation(&policy, at(14, 0, 0));
        let backup = match outcome {
            RotationOutcome::Rotated { backup } => backup.unwrap(),
            other => panic!("expected rotation, got {:?}", other),
        };

        // Named after the new hour
        assert_eq!(backup, temp_dir.path().join("app.log_2026012114"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        sink.write_record(&record("after boundary", at(14, 0, 0)))
            .unwrap();
        sink.flush().unwrap();

        let old = fs::read_to_string(&backup).unwrap();
        let new = fs::read_to_string(&path).unwrap();
        assert!(old.contains("before boundary"));
        assert!(!old.contains("after boundary"));
        assert!(new.contains("after boundary"));
        assert!(!new.contains("before boundary"));
    }

    #[test]
    fn test_hour_rotation_only_once_per_hour() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");
        let policy = RotationPolicy::ByHour;

        let mut sink = FileSink::open(path, at(9, 0, 0)).unwrap();
        assert!(matches!(
            sink.check_rotation(&policy, at(10, 0, 0)),
            RotationOutcome::Rotated { .. }
        ));
        assert!(matches!(
            sink.check_rotation(&policy, at(10, 30, 0)),
            RotationOutcome::NotNeeded
        ));
        assert!(matches!(
            sink.check_rotation(&policy, at(10, 59, 59)),
            RotationOutcome::NotNeeded
        ));
    }

    #[test]
    fn test_hour_rotation_after_full_day() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");
        let policy = RotationPolicy::ByHour;
        let start = at(3, 0, 0);

        let mut sink = FileSink::open(path, start).unwrap();
        write(&mut sink, &policy, "day one", start);

        let next_day = start + chrono::Duration::days(1);
        match sink.check_rotation(&policy, next_day) {
            RotationOutcome::Rotated { backup } => {
                assert_eq!(
                    backup.unwrap(),
                    temp_dir.path().join("app.log_2026012203")
                );
            }
            other => panic!("expected rotation, got {:?}", other),
        }
    }

    #[test]
    fn test_size_rotation_once_per_crossing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");
        let policy = RotationPolicy::BySize { threshold: 100 };
        let now = at(12, 0, 0);

        let mut sink = FileSink::open(path.clone(), now).unwrap();

        let mut rotations = 0;
        for i in 0..3 {
            if let RotationOutcome::Rotated { .. } = sink.check_rotation(&policy, now) {
                rotations += 1;
            }
            sink.write_record(&record(&format!("line {} {}", i, "x".repeat(20)), now))
                .unwrap();
        }
        // Each line is 77 bytes, so the threshold is crossed once, after the second write
        assert_eq!(rotations, 1);

        sink.flush().unwrap();
        let backup = temp_dir.path().join("app.log_20260121120000");
        let old = fs::read_to_string(&backup).unwrap();
        let new = fs::read_to_string(&path).unwrap();
        assert!(old.contains("line 0") && old.contains("line 1"));
        assert!(!old.contains("line 2"));
        assert!(new.contains("line 2"));
        assert_eq!(new.lines().count(), 1);
    }

    #[test]
    fn test_size_rotation_new_file_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log.wf");
        let policy = RotationPolicy::BySize { threshold: 10 };
        let now = at(12, 0, 0);

        let mut sink = FileSink::open(path.clone(), now).unwrap();
        sink.write_record(&record("more than ten bytes", now)).unwrap();

        assert!(matches!(
            sink.check_rotation(&policy, now),
            RotationOutcome::Rotated { .. }
        ));
        assert_eq!(sink.size(), 0);
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_size_rotation_same_second_keeps_both_backups() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");
        let policy = RotationPolicy::BySize { threshold: 10 };
        let now = at(12, 0, 0);

        let mut sink = FileSink::open(path, now).unwrap();
        write(&mut sink, &policy, "first batch of text", now);
        write(&mut sink, &policy, "second batch of text", now);
        write(&mut sink, &policy, "third", now);
        sink.flush().unwrap();

        let first = temp_dir.path().join("app.log_20260121120000");
        let second = temp_dir.path().join("app.log_20260121120000.1");
        assert!(fs::read_to_string(first).unwrap().contains("first batch"));
        assert!(fs::read_to_string(second).unwrap().contains("second batch"));
    }

    #[test]
    fn test_failed_rotation_keeps_handle_and_retries() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs");
        fs::create_dir(&log_dir).unwrap();
        let path = log_dir.join("app.log");
        let policy = RotationPolicy::ByHour;

        let mut sink = FileSink::open(path.clone(), at(8, 0, 0)).unwrap();
        write(&mut sink, &policy, "first", at(8, 10, 0));

        // Without the directory the fresh file cannot be opened
        fs::remove_dir_all(&log_dir).unwrap();
        assert!(matches!(
            sink.check_rotation(&policy, at(9, 0, 0)),
            RotationOutcome::Failed(_)
        ));
        // The old handle is still usable
        sink.write_record(&record("while broken", at(9, 0, 1)))
            .unwrap();
        sink.flush().unwrap();

        // Once the directory is back, the next check reopens the file
        fs::create_dir(&log_dir).unwrap();
        match sink.check_rotation(&policy, at(9, 0, 2)) {
            RotationOutcome::Rotated { backup } => assert!(backup.is_none()),
            other => panic!("expected rotation, got {:?}", other),
        }
        sink.write_record(&record("recovered", at(9, 0, 3))).unwrap();
        sink.flush().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("recovered"));
        assert!(matches!(
            sink.check_rotation(&policy, at(9, 30, 0)),
            RotationOutcome::NotNeeded
        ));
    }
}
