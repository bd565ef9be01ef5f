//! What happens to buffered lines when the writer shuts down

use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy for lines still queued when the writer is closed
///
/// # Example
///
/// ```
/// use rust_blocking_logger::ClosePolicy;
///
/// // Default: fast shutdown, buffered lines are dropped
/// assert_eq!(ClosePolicy::default(), ClosePolicy::Discard);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClosePolicy {
    /// Drop buffered lines and stop the writer right away
    ///
    /// Shutdown time does not depend on how far the writer has fallen behind.
    /// Dropped lines are counted in the metrics.
    #[default]
    Discard,

    /// Stop accepting new lines but let the writer persist what is buffered
    ///
    /// Shutdown waits for the backlog, which is at most the queue capacity.
    Drain,
}

impl fmt::Display for ClosePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClosePolicy::Discard => write!(f, "Discard"),
            ClosePolicy::Drain => write!(f, "Drain"),
        }
    }
}
