//! # Rust Blocking Logger
//!
//! An asynchronous file logger built on a bounded blocking deque.
//!
//! Producer threads format log lines and push them onto a fixed-capacity
//! queue; a dedicated writer thread drains it into rotating log files. When
//! the writer falls behind, producers block instead of dropping lines or
//! growing memory.
//!
//! ## Features
//!
//! - **Bounded Queue**: [`BoundedBlockingDeque`] with blocking push, timed pop
//!   and urgent push to the front
//! - **Backpressure**: producers wait for space; nothing is silently dropped
//! - **Rotation**: a new file per calendar day and every `max_lines` lines
//! - **Sync Mode**: optional direct writes without the writer thread
//! - **Metrics**: atomic counters for written, filtered and lost lines
//!
//! ## Example
//!
//! ```no_run
//! use rust_blocking_logger::prelude::*;
//! use rust_blocking_logger::info;
//!
//! let writer = AsyncLogWriter::builder()
//!     .directory("./log")
//!     .base_name("server")
//!     .build()?;
//!
//! info!(writer, "listening on port {}", 8080);
//! writer.shutdown();
//! # Ok::<(), LoggerError>(())
//! ```

pub mod appenders;
pub mod core;
pub mod macros;
pub mod queue;

pub mod prelude {
    pub use crate::appenders::{MemoryAppender, RotatingFileAppender, RotationPolicy};
    pub use crate::core::{
        Appender, AsyncLogWriter, AsyncLogWriterBuilder, ClosePolicy, LogEntry, LogLevel,
        LoggerConfig, LoggerError, Result, TimestampFormat, WriteMode, WriterMetrics,
        DEFAULT_FLUSH_TIMEOUT,
    };
    pub use crate::queue::{BoundedBlockingDeque, PopTimeoutError, QueueClosed};
}

pub use crate::appenders::{MemoryAppender, RotatingFileAppender, RotationPolicy};
pub use crate::core::{
    global, Appender, AsyncLogWriter, AsyncLogWriterBuilder, ClosePolicy, LogEntry, LogLevel,
    LoggerConfig, LoggerError, Result, Singleton, TimestampFormat, WriteMode, WriterMetrics,
    DEFAULT_FLUSH_TIMEOUT,
};
pub use crate::queue::{BoundedBlockingDeque, PopTimeoutError, QueueClosed, DEFAULT_CAPACITY};
