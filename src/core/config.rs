//! Logger configuration
//!
//! [`LoggerConfig`] gathers everything fixed at construction time. It can be
//! built in code, through [`AsyncLogWriterBuilder`](super::AsyncLogWriterBuilder),
//! or loaded from JSON.

use super::close_policy::ClosePolicy;
use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use crate::queue::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default number of lines per file before rotating
pub const DEFAULT_MAX_LINES: u64 = 50_000;

/// Default idle interval after which the writer thread flushes pending output
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 100;

/// Whether producers hand lines to a writer thread or write them themselves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteMode {
    /// Producers write straight to the file under a lock
    Sync,
    /// Producers enqueue lines; a dedicated thread writes them
    #[default]
    Async,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::Sync => write!(f, "Sync"),
            WriteMode::Async => write!(f, "Async"),
        }
    }
}

/// Construction-time settings for [`AsyncLogWriter`](super::AsyncLogWriter)
///
/// Missing JSON fields fall back to their defaults.
///
/// # Example
///
/// ```
/// use rust_blocking_logger::{LoggerConfig, LogLevel, WriteMode};
///
/// let config = LoggerConfig::from_json_str(
///     r#"{ "capacity": 64, "mode": "Sync", "min_level": "Debug" }"#,
/// ).unwrap();
///
/// assert_eq!(config.capacity, 64);
/// assert_eq!(config.mode, WriteMode::Sync);
/// assert_eq!(config.min_level, LogLevel::Debug);
/// assert_eq!(config.base_name, "app");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Maximum number of queued lines before producers block
    pub capacity: usize,
    pub mode: WriteMode,
    /// Directory that receives the log files
    pub directory: PathBuf,
    /// File name prefix; files are named `{base_name}_{YYYY_MM_DD}[-n].log`
    pub base_name: String,
    /// Lines per file before rotating; `0` disables line-based rotation
    pub max_lines: u64,
    /// Start a new file when the local calendar day changes
    pub rotate_daily: bool,
    pub min_level: LogLevel,
    pub close_policy: ClosePolicy,
    /// Idle interval after which the writer flushes pending output
    pub flush_interval_ms: u64,
    pub timestamp_format: TimestampFormat,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            mode: WriteMode::Async,
            directory: PathBuf::from("./log"),
            base_name: "app".to_string(),
            max_lines: DEFAULT_MAX_LINES,
            rotate_daily: true,
            min_level: LogLevel::Info,
            close_policy: ClosePolicy::Discard,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            timestamp_format: TimestampFormat::default(),
        }
    }
}

impl LoggerConfig {
    /// Parse a configuration from JSON and validate it
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are invalid.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values that would make construction fail
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] describing the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "capacity must be greater than zero",
            ));
        }
        if self.base_name.trim().is_empty() {
            return Err(LoggerError::config("LoggerConfig", "base_name must not be empty"));
        }
        if self.base_name.contains(['/', '\\']) {
            return Err(LoggerError::config(
                "LoggerConfig",
                format!("base_name '{}' must not contain path separators", self.base_name),
            ));
        }
        self.timestamp_format.validate()?;
        if self.mode == WriteMode::Async && self.flush_interval_ms == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "flush_interval_ms must be greater than zero in async mode",
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }
}
