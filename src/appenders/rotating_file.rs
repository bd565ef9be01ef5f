//! Rotating file appender
//!
//! Writes lines to `{dir}/{base}_{YYYY_MM_DD}.log` and moves on to a new file
//! when the local calendar day changes or the current file reaches its line
//! cap. Later files for the same day are `{base}_{YYYY_MM_DD}-{n}.log`; a name
//! that already exists on disk is skipped, so rotation never reopens an older
//! file.

use crate::core::appender::Appender;
use crate::core::config::DEFAULT_MAX_LINES;
use crate::core::error::{LoggerError, Result};
use chrono::{Local, NaiveDate};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Lines written to the current file before retrying a failed rotation
pub const ROTATION_RETRY_LINES: u64 = 100;

/// When to start a new file
///
/// # Examples
///
/// ```
/// use rust_blocking_logger::appenders::RotationPolicy;
///
/// // New file every 10 000 lines, and at every day boundary
/// let policy = RotationPolicy::new().with_max_lines(10_000);
///
/// // Only rotate on the day boundary
/// let policy = RotationPolicy::new().with_max_lines(0);
/// assert!(policy.daily);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Lines per file before rotating; `0` means no line cap
    pub max_lines: u64,
    /// Rotate when the local date changes
    pub daily: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            daily: true,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_lines(mut self, max_lines: u64) -> Self {
        self.max_lines = max_lines;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_daily(mut self, daily: bool) -> Self {
        self.daily = daily;
        self
    }
}

/// File appender that rotates by day and by line count
///
/// # Examples
///
/// ```no_run
/// use rust_blocking_logger::appenders::{RotatingFileAppender, RotationPolicy};
///
/// let appender = RotatingFileAppender::new("./log", "server", RotationPolicy::default()).unwrap();
/// println!("writing to {}", appender.current_path().display());
/// ```
pub struct RotatingFileAppender {
    directory: PathBuf,
    base_name: String,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_path: PathBuf,
    current_day: NaiveDate,
    sequence: u32,
    lines_in_file: u64,
    rotations: u64,
    /// Lines left before a failed rotation is attempted again
    rotation_backoff: u64,
}

impl RotatingFileAppender {
    /// Open (or create) today's log file in `directory`
    ///
    /// An existing file for today is appended to, and its lines count toward
    /// the line cap.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created or opened
    pub fn new(
        directory: impl Into<PathBuf>,
        base_name: impl Into<String>,
        policy: RotationPolicy,
    ) -> Result<Self> {
        let directory = directory.into();
        let base_name = base_name.into();

        fs::create_dir_all(&directory).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", directory.display()),
                e,
            )
        })?;

        let today = Local::now().date_naive();
        let current_path = Self::file_path(&directory, &base_name, today, 0);
        let (file, lines_in_file) = Self::open_counting(&current_path)?;

        Ok(Self {
            directory,
            base_name,
            policy,
            writer: Some(BufWriter::new(file)),
            current_path,
            current_day: today,
            sequence: 0,
            lines_in_file,
            rotations: 0,
            rotation_backoff: 0,
        })
    }

    fn file_path(directory: &Path, base_name: &str, day: NaiveDate, sequence: u32) -> PathBuf {
        let date = day.format("%Y_%m_%d");
        if sequence == 0 {
            directory.join(format!("{}_{}.log", base_name, date))
        } else {
            directory.join(format!("{}_{}-{}.log", base_name, date, sequence))
        }
    }

    fn open_counting(path: &Path) -> Result<(File, u64)> {
        let lines = if path.exists() {
            Self::count_lines(path)?
        } else {
            0
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })?;

        Ok((file, lines))
    }

    fn count_lines(path: &Path) -> Result<u64> {
        let mut file = File::open(path).map_err(|e| {
            LoggerError::io_operation(
                "count existing log lines",
                format!("Failed to open '{}'", path.display()),
                e,
            )
        })?;

        let mut buffer = vec![0u8; 64 * 1024];
        let mut lines = 0u64;
        loop {
            let read = file.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            lines += buffer[..read].iter().filter(|&&b| b == b'\n').count() as u64;
        }
        Ok(lines)
    }

    fn should_rotate(&self, today: NaiveDate) -> bool {
        let day_changed = self.policy.daily && today != self.current_day;
        let cap_reached = self.policy.max_lines > 0 && self.lines_in_file >= self.policy.max_lines;
        day_changed || cap_reached
    }

    /// Open the next unused name and switch to it
    ///
    /// The current file stays in use if the new one cannot be opened.
    fn rotate(&mut self, today: NaiveDate) -> Result<()> {
        let mut sequence = if today != self.current_day {
            0
        } else {
            self.sequence + 1
        };
        let mut path = Self::file_path(&self.directory, &self.base_name, today, sequence);
        while path.exists() {
            sequence += 1;
            path = Self::file_path(&self.directory, &self.base_name, today, sequence);
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    path.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;

        if let Some(mut previous) = self.writer.replace(BufWriter::new(file)) {
            if let Err(e) = previous.flush() {
                eprintln!(
                    "[LOGGER WARNING] Failed to flush '{}' before rotation: {}",
                    self.current_path.display(),
                    e
                );
            }
        }

        self.current_path = path;
        self.current_day = today;
        self.sequence = sequence;
        self.lines_in_file = 0;
        self.rotations += 1;
        Ok(())
    }

    fn append_line_on(&mut self, line: &str, today: NaiveDate) -> Result<()> {
        if self.rotation_backoff > 0 {
            self.rotation_backoff -= 1;
        } else if self.should_rotate(today) {
            if let Err(e) = self.rotate(today) {
                eprintln!(
                    "[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.",
                    e
                );
                self.rotation_backoff = ROTATION_RETRY_LINES;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;

        writer.write_all(line.as_bytes()).map_err(|e| {
            LoggerError::file_appender(
                self.current_path.display().to_string(),
                format!("Failed to write log line: {}", e),
            )
        })?;
        self.lines_in_file += 1;
        Ok(())
    }

    /// Path of the file currently being written
    #[must_use]
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    /// Lines in the current file, including any found when it was opened
    #[must_use]
    pub fn lines_in_file(&self) -> u64 {
        self.lines_in_file
    }

    /// Number of rotations since construction
    #[must_use]
    pub fn rotations(&self) -> u64 {
        self.rotations
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

impl Appender for RotatingFileAppender {
    fn append_line(&mut self, line: &str) -> Result<()> {
        self.append_line_on(line, Local::now().date_naive())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.current_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "RotatingFileAppender"
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
