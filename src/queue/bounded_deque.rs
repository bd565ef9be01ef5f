//! Bounded blocking double-ended queue
//!
//! A fixed-capacity deque shared between producer and consumer threads.
//! Pushes block while the queue is full, pops block while it is empty, and
//! [`close`](BoundedBlockingDeque::close) releases every blocked thread at once.
//!
//! All state lives behind a single mutex. Producers wait on `not_full`,
//! consumers wait on `not_empty`; every wait sits inside a loop that re-tests
//! its predicate after waking, so spurious wakeups and several waiters being
//! released together are both harmless.

use super::error::{PopTimeoutError, QueueClosed};
use crate::core::error::{LoggerError, Result};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Default number of buffered items
pub const DEFAULT_CAPACITY: usize = 1000;

struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Capacity-bounded deque with blocking push/pop and broadcast shutdown
///
/// # Example
///
/// ```
/// use rust_blocking_logger::queue::BoundedBlockingDeque;
///
/// let queue = BoundedBlockingDeque::new(2).unwrap();
/// queue.push_back("normal").unwrap();
/// queue.push_front("urgent").unwrap();
///
/// assert_eq!(queue.pop_front(), Some("urgent"));
/// assert_eq!(queue.pop_front(), Some("normal"));
///
/// queue.close();
/// assert_eq!(queue.pop_front(), None);
/// assert!(queue.push_back("late").is_err());
/// ```
pub struct BoundedBlockingDeque<T> {
    state: Mutex<State<T>>,
    capacity: usize,
    not_full: Condvar,
    not_empty: Condvar,
}

impl<T> BoundedBlockingDeque<T> {
    /// Create an open queue holding at most `capacity` items
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(LoggerError::config(
                "BoundedBlockingDeque",
                "capacity must be greater than zero",
            ));
        }

        Ok(Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                closed: false,
            }),
            capacity,
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        })
    }

    /// Insert at the tail, blocking while the queue is open and full
    ///
    /// If the queue is closed before room appears, the item is not inserted
    /// and comes back inside the error.
    pub fn push_back(&self, item: T) -> std::result::Result<(), QueueClosed<T>> {
        self.push_with(item, VecDeque::push_back)
    }

    /// Insert at the head, ahead of everything already buffered
    ///
    /// Blocks exactly like [`push_back`](Self::push_back).
    pub fn push_front(&self, item: T) -> std::result::Result<(), QueueClosed<T>> {
        self.push_with(item, VecDeque::push_front)
    }

    fn push_with(
        &self,
        item: T,
        insert: fn(&mut VecDeque<T>, T),
    ) -> std::result::Result<(), QueueClosed<T>> {
        let mut state = self.state.lock();
        while !state.closed && state.items.len() >= self.capacity {
            self.not_full.wait(&mut state);
        }

        if state.closed {
            return Err(QueueClosed(item));
        }

        insert(&mut state.items, item);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove the head item, blocking while the queue is open and empty
    ///
    /// Returns `None` once the queue is closed and has nothing left to hand
    /// out.
    pub fn pop_front(&self) -> Option<T> {
        let mut state = self.state.lock();
        while !state.closed && state.items.is_empty() {
            self.not_empty.wait(&mut state);
        }

        let item = state.items.pop_front()?;
        self.not_full.notify_one();
        Some(item)
    }

    /// Remove the head item, waiting at most `timeout` for one to arrive
    ///
    /// The wait runs against a fixed deadline, so wakeups that find the queue
    /// still empty do not extend it.
    ///
    /// # Errors
    ///
    /// [`PopTimeoutError::Timeout`] if the deadline passed with the queue open
    /// and empty, [`PopTimeoutError::Closed`] if the queue is closed and empty.
    pub fn pop_front_timeout(&self, timeout: Duration) -> std::result::Result<T, PopTimeoutError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.pop_front().ok_or(PopTimeoutError::Closed);
        };

        let mut state = self.state.lock();
        while !state.closed && state.items.is_empty() {
            if self.not_empty.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }

        match state.items.pop_front() {
            Some(item) => {
                self.not_full.notify_one();
                Ok(item)
            }
            None if state.closed => Err(PopTimeoutError::Closed),
            None => Err(PopTimeoutError::Timeout),
        }
    }

    /// Remove every buffered item, returning how many were removed
    ///
    /// Capacity and the closed flag are untouched. Blocked producers are woken
    /// since the queue now has room.
    pub fn clear(&self) -> usize {
        let removed = {
            let mut state = self.state.lock();
            std::mem::take(&mut state.items)
        };
        self.not_full.notify_all();
        removed.len()
    }

    /// Close the queue, discarding buffered items
    ///
    /// Every thread blocked in a push or pop is woken and observes the closed
    /// state. Later pushes are rejected and later pops return `None` without
    /// blocking. Calling this again is a no-op that returns `0`.
    ///
    /// Returns the number of buffered items that were discarded.
    pub fn close(&self) -> usize {
        let discarded = {
            let mut state = self.state.lock();
            state.closed = true;
            std::mem::take(&mut state.items)
        };
        self.not_full.notify_all();
        self.not_empty.notify_all();
        discarded.len()
    }

    /// Close the queue but let consumers drain what is already buffered
    ///
    /// Pushes are rejected from here on. Pops keep returning buffered items
    /// until the queue is empty, then report closed. Idempotent.
    ///
    /// Returns the number of items left for consumers to drain.
    pub fn close_draining(&self) -> usize {
        let remaining = {
            let mut state = self.state.lock();
            state.closed = true;
            state.items.len()
        };
        self.not_full.notify_all();
        self.not_empty.notify_all();
        remaining
    }

    /// Wake one blocked consumer
    ///
    /// The woken thread re-checks its predicate and goes back to waiting if
    /// nothing changed.
    pub fn notify_consumer(&self) {
        self.not_empty.notify_one();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Snapshot; may be stale as soon as it returns
    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Snapshot; may be stale as soon as it returns
    pub fn is_full(&self) -> bool {
        self.state.lock().items.len() >= self.capacity
    }

    /// Number of buffered items (snapshot)
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> BoundedBlockingDeque<T> {
    /// Copy of the head item without removing it, `None` if empty
    pub fn front(&self) -> Option<T> {
        self.state.lock().items.front().cloned()
    }

    /// Copy of the tail item without removing it, `None` if empty
    pub fn back(&self) -> Option<T> {
        self.state.lock().items.back().cloned()
    }
}

impl<T> fmt::Debug for BoundedBlockingDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BoundedBlockingDeque")
            .field("len", &state.items.len())
            .field("capacity", &self.capacity)
            .field("closed", &state.closed)
            .finish()
    }
}
