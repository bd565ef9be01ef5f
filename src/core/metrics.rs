//! Writer metrics for observability
//!
//! Counters describing how lines moved through the writer: accepted into the
//! queue, persisted, filtered, or lost at shutdown.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for log writer observability
///
/// # Example
///
/// ```
/// use rust_blocking_logger::WriterMetrics;
///
/// let metrics = WriterMetrics::new();
///
/// metrics.record_accepted();
/// metrics.record_written();
///
/// assert_eq!(metrics.lines_accepted(), 1);
/// assert_eq!(metrics.lines_written(), 1);
/// ```
#[derive(Debug)]
pub struct WriterMetrics {
    /// Lines handed to the queue (or written directly in sync mode)
    lines_accepted: AtomicU64,

    /// Lines successfully appended to the output
    lines_written: AtomicU64,

    /// Calls skipped because the level was below the threshold
    lines_filtered: AtomicU64,

    /// Buffered lines thrown away when the queue was closed
    lines_discarded: AtomicU64,

    /// Lines refused because the writer was already shut down
    lines_rejected: AtomicU64,

    /// Appends or flushes that returned an error or panicked
    write_failures: AtomicU64,

    /// Producers that found the queue full and had to wait
    block_events: AtomicU64,
}

impl WriterMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            lines_accepted: AtomicU64::new(0),
            lines_written: AtomicU64::new(0),
            lines_filtered: AtomicU64::new(0),
            lines_discarded: AtomicU64::new(0),
            lines_rejected: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn lines_accepted(&self) -> u64 {
        self.lines_accepted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lines_written(&self) -> u64 {
        self.lines_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lines_filtered(&self) -> u64 {
        self.lines_filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lines_discarded(&self) -> u64 {
        self.lines_discarded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lines_rejected(&self) -> u64 {
        self.lines_rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_accepted(&self) -> u64 {
        self.lines_accepted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.lines_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.lines_filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_discarded(&self, count: u64) -> u64 {
        self.lines_discarded.fetch_add(count, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.lines_rejected.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of accepted lines that never reached the output, as a percentage
    ///
    /// Returns 0.0 if nothing has been accepted.
    pub fn loss_rate(&self) -> f64 {
        let accepted = self.lines_accepted() as f64;
        if accepted == 0.0 {
            return 0.0;
        }
        let lost = (self.lines_discarded() + self.write_failures()) as f64;
        (lost / accepted * 100.0).min(100.0)
    }
}

impl Default for WriterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for WriterMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            lines_accepted: AtomicU64::new(self.lines_accepted()),
            lines_written: AtomicU64::new(self.lines_written()),
            lines_filtered: AtomicU64::new(self.lines_filtered()),
            lines_discarded: AtomicU64::new(self.lines_discarded()),
            lines_rejected: AtomicU64::new(self.lines_rejected()),
            write_failures: AtomicU64::new(self.write_failures()),
            block_events: AtomicU64::new(self.block_events()),
        }
    }
}
