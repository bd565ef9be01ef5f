//! Bounded blocking queue used to hand log lines to the writer thread

pub mod bounded_deque;
pub mod error;

pub use bounded_deque::{BoundedBlockingDeque, DEFAULT_CAPACITY};
pub use error::{PopTimeoutError, QueueClosed};
