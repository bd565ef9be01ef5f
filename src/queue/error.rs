//! Control-flow signals returned by the blocking deque
//!
//! These are expected outcomes of a push or pop, not failures of the queue
//! itself, so they are kept apart from [`LoggerError`](crate::core::LoggerError).

use std::fmt;

/// Returned by a push when the queue has been closed.
///
/// The rejected item is handed back so the caller can inspect or drop it.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct QueueClosed<T>(pub T);

impl<T> QueueClosed<T> {
    /// Take back the item that was not enqueued
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for QueueClosed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("QueueClosed { .. }")
    }
}

impl<T> fmt::Display for QueueClosed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("pushing into a closed queue")
    }
}

impl<T> std::error::Error for QueueClosed<T> {}

/// Outcome of a timed pop that did not produce an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PopTimeoutError {
    /// The deadline elapsed while the queue stayed open and empty
    #[error("timed out waiting on an empty queue")]
    Timeout,

    /// The queue is closed and holds nothing more to hand out
    #[error("popping from an empty and closed queue")]
    Closed,
}

impl PopTimeoutError {
    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(self, PopTimeoutError::Timeout)
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        matches!(self, PopTimeoutError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_closed_returns_item() {
        let err = QueueClosed(String::from("payload"));
        assert_eq!(err.to_string(), "pushing into a closed queue");
        assert_eq!(format!("{:?}", err), "QueueClosed { .. }");
        assert_eq!(err.into_inner(), "payload");
    }

    #[test]
    fn test_pop_timeout_error_kinds() {
        assert!(PopTimeoutError::Timeout.is_timeout());
        assert!(!PopTimeoutError::Timeout.is_closed());
        assert!(PopTimeoutError::Closed.is_closed());
        assert_eq!(
            PopTimeoutError::Closed.to_string(),
            "popping from an empty and closed queue"
        );
    }
}
