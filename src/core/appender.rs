//! Appender trait for log output destinations

use super::error::Result;

/// Destination for fully formatted log lines
///
/// An appender is owned by exactly one thread at a time (the writer thread in
/// async mode, the lock holder in sync mode), so it only needs to be `Send`.
pub trait Appender: Send {
    /// Persist one line; `line` already ends with `'\n'`
    fn append_line(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
