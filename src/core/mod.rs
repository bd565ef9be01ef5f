//! Core writer types and traits

pub mod appender;
pub mod close_policy;
pub mod config;
pub mod error;
pub mod global;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod timestamp;

pub use appender::Appender;
pub use close_policy::ClosePolicy;
pub use config::{LoggerConfig, WriteMode, DEFAULT_FLUSH_INTERVAL_MS, DEFAULT_MAX_LINES};
pub use error::{LoggerError, Result};
pub use global::Singleton;
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{AsyncLogWriter, AsyncLogWriterBuilder, DEFAULT_FLUSH_TIMEOUT};
pub use metrics::WriterMetrics;
pub use timestamp::TimestampFormat;
