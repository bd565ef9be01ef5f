//! Logging macros for ergonomic log message formatting.
//!
//! The message is only formatted when the writer's threshold admits the
//! level, so disabled debug lines cost a level comparison.
//!
//! # Examples
//!
//! ```
//! use rust_blocking_logger::prelude::*;
//! use rust_blocking_logger::info;
//!
//! let writer = AsyncLogWriter::builder()
//!     .sync_mode()
//!     .appender(MemoryAppender::new())
//!     .build()
//!     .unwrap();
//!
//! // Basic logging
//! info!(writer, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(writer, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_blocking_logger::prelude::*;
/// # let writer = AsyncLogWriter::builder().sync_mode().appender(MemoryAppender::new()).build().unwrap();
/// use rust_blocking_logger::log;
/// log!(writer, LogLevel::Info, "Simple message");
/// log!(writer, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($writer:expr, $level:expr, $($arg:tt)+) => {
        $writer.write_with($level, || format!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_blocking_logger::prelude::*;
/// # let writer = AsyncLogWriter::builder().sync_mode().appender(MemoryAppender::new()).build().unwrap();
/// use rust_blocking_logger::debug;
/// debug!(writer, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($writer:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_blocking_logger::prelude::*;
/// # let writer = AsyncLogWriter::builder().sync_mode().appender(MemoryAppender::new()).build().unwrap();
/// use rust_blocking_logger::info;
/// info!(writer, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($writer:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_blocking_logger::prelude::*;
/// # let writer = AsyncLogWriter::builder().sync_mode().appender(MemoryAppender::new()).build().unwrap();
/// use rust_blocking_logger::warn;
/// warn!(writer, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($writer:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_blocking_logger::prelude::*;
/// # let writer = AsyncLogWriter::builder().sync_mode().appender(MemoryAppender::new()).build().unwrap();
/// use rust_blocking_logger::error;
/// error!(writer, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($writer:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Error, $($arg)+)
    };
}
