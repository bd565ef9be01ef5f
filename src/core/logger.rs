//! Asynchronous log writer
//!
//! Producer threads format lines and push them onto a bounded queue; one
//! dedicated thread pops them and hands them to the appender. A full queue
//! blocks the producer instead of growing or dropping.

use super::{
    appender::Appender,
    close_policy::ClosePolicy,
    config::{LoggerConfig, WriteMode},
    error::{LoggerError, Result},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::WriterMetrics,
    timestamp::TimestampFormat,
};
use crate::appenders::{RotatingFileAppender, RotationPolicy};
use crate::queue::{BoundedBlockingDeque, PopTimeoutError};
use parking_lot::{Condvar, Mutex, RwLock};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default upper bound for [`AsyncLogWriter::flush`] (5 seconds)
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Lines the writer thread may buffer before flushing while the queue stays busy
const FLUSH_BATCH: u64 = 64;

const WRITER_THREAD_NAME: &str = "log-writer";

/// Count of queued lines that have reached the appender and been flushed
struct FlushProgress {
    state: Mutex<ProgressState>,
    advanced: Condvar,
}

struct ProgressState {
    persisted: u64,
    finished: bool,
}

impl FlushProgress {
    fn new() -> Self {
        Self {
            state: Mutex::new(ProgressState {
                persisted: 0,
                finished: false,
            }),
            advanced: Condvar::new(),
        }
    }

    fn advance(&self, lines: u64) {
        if lines == 0 {
            return;
        }
        self.state.lock().persisted += lines;
        self.advanced.notify_all();
    }

    /// Called once by the writer thread on exit
    fn finish(&self, lines: u64) {
        {
            let mut state = self.state.lock();
            state.persisted += lines;
            state.finished = true;
        }
        self.advanced.notify_all();
    }

    /// Wait until `target` lines are persisted or the writer has exited.
    /// On timeout, returns the number of lines still outstanding.
    fn wait_for(&self, target: u64, timeout: Duration) -> std::result::Result<(), u64> {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.state.lock();
        while state.persisted < target && !state.finished {
            match deadline {
                Some(deadline) => {
                    if self.advanced.wait_until(&mut state, deadline).timed_out()
                        && state.persisted < target
                        && !state.finished
                    {
                        return Err(target - state.persisted);
                    }
                }
                None => self.advanced.wait(&mut state),
            }
        }
        Ok(())
    }
}

struct AsyncBackend {
    queue: Arc<BoundedBlockingDeque<String>>,
    worker: Mutex<Option<JoinHandle<Box<dyn Appender>>>>,
    progress: Arc<FlushProgress>,
    /// Lines successfully pushed; the flush target
    accepted: AtomicU64,
}

enum Backend {
    Async(AsyncBackend),
    /// `None` once shut down
    Sync(Mutex<Option<Box<dyn Appender>>>),
}

/// Log writer that decouples producer threads from file I/O
///
/// # Example
///
/// ```no_run
/// use rust_blocking_logger::prelude::*;
///
/// let writer = AsyncLogWriter::builder()
///     .directory("./log")
///     .base_name("server")
///     .capacity(1000)
///     .min_level(LogLevel::Debug)
///     .build()?;
///
/// writer.info("server started");
/// writer.write(LogLevel::Warn, format!("{} connections pending", 12));
/// writer.flush()?;
/// writer.shutdown();
/// # Ok::<(), LoggerError>(())
/// ```
pub struct AsyncLogWriter {
    min_level: RwLock<LogLevel>,
    timestamp_format: TimestampFormat,
    close_policy: ClosePolicy,
    backend: Backend,
    metrics: Arc<WriterMetrics>,
}

impl AsyncLogWriter {
    /// Create a writer backed by a rotating file in `config.directory`
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, the initial file cannot be
    /// opened, or the writer thread cannot be started.
    pub fn new(config: LoggerConfig) -> Result<Self> {
        config.validate()?;
        let policy = RotationPolicy::new()
            .with_max_lines(config.max_lines)
            .with_daily(config.rotate_daily);
        let appender = RotatingFileAppender::new(&config.directory, config.base_name.clone(), policy)?;
        Self::with_appender(config, Box::new(appender))
    }

    /// Create a writer that sends its lines to `appender`
    ///
    /// The directory, file name, and rotation fields of `config` are unused.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the writer thread cannot be
    /// started.
    pub fn with_appender(config: LoggerConfig, appender: Box<dyn Appender>) -> Result<Self> {
        config.validate()?;
        let metrics = Arc::new(WriterMetrics::new());

        let backend = match config.mode {
            WriteMode::Sync => Backend::Sync(Mutex::new(Some(appender))),
            WriteMode::Async => {
                let queue = Arc::new(BoundedBlockingDeque::new(config.capacity)?);
                let progress = Arc::new(FlushProgress::new());
                let flush_interval = config.flush_interval();

                let handle = {
                    let queue = Arc::clone(&queue);
                    let progress = Arc::clone(&progress);
                    let metrics = Arc::clone(&metrics);
                    thread::Builder::new()
                        .name(WRITER_THREAD_NAME.to_string())
                        .spawn(move || {
                            Self::run_writer(appender, &queue, &progress, &metrics, flush_interval)
                        })
                        .map_err(|e| {
                            LoggerError::io_operation(
                                "spawn writer thread",
                                "Failed to start the log writer thread",
                                e,
                            )
                        })?
                };

                Backend::Async(AsyncBackend {
                    queue,
                    worker: Mutex::new(Some(handle)),
                    progress,
                    accepted: AtomicU64::new(0),
                })
            }
        };

        Ok(Self {
            min_level: RwLock::new(config.min_level),
            timestamp_format: config.timestamp_format,
            close_policy: config.close_policy,
            backend,
            metrics,
        })
    }

    /// Writer thread body; returns the appender so shutdown can flush and
    /// release it after the thread is gone
    fn run_writer(
        mut appender: Box<dyn Appender>,
        queue: &BoundedBlockingDeque<String>,
        progress: &FlushProgress,
        metrics: &WriterMetrics,
        flush_interval: Duration,
    ) -> Box<dyn Appender> {
        let mut unflushed = 0u64;

        loop {
            match queue.pop_front_timeout(flush_interval) {
                Ok(line) => {
                    Self::append_isolated(appender.as_mut(), &line, metrics);
                    unflushed += 1;

                    if unflushed >= FLUSH_BATCH || queue.is_empty() {
                        Self::flush_isolated(appender.as_mut(), metrics);
                        progress.advance(std::mem::take(&mut unflushed));
                    }
                }
                Err(PopTimeoutError::Timeout) => {
                    if unflushed > 0 {
                        Self::flush_isolated(appender.as_mut(), metrics);
                        progress.advance(std::mem::take(&mut unflushed));
                    }
                }
                Err(PopTimeoutError::Closed) => break,
            }
        }

        Self::flush_isolated(appender.as_mut(), metrics);
        progress.finish(unflushed);
        appender
    }

    /// Append one line, turning errors and panics into counted failures so
    /// the caller keeps running
    fn append_isolated(appender: &mut dyn Appender, line: &str, metrics: &WriterMetrics) {
        let result = panic::catch_unwind(AssertUnwindSafe(|| appender.append_line(line)));

        match result {
            Ok(Ok(())) => {
                metrics.record_written();
            }
            Ok(Err(e)) => {
                let previous = metrics.record_write_failure();
                if Self::should_report(previous) {
                    eprintln!(
                        "[LOGGER ERROR] Appender '{}' failed ({} failures so far): {}",
                        appender.name(),
                        previous + 1,
                        e
                    );
                }
            }
            Err(panic_info) => {
                let previous = metrics.record_write_failure();
                if Self::should_report(previous) {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender '{}' panicked: {}. Writer continues.",
                        appender.name(),
                        panic_message(panic_info.as_ref())
                    );
                }
            }
        }
    }

    fn flush_isolated(appender: &mut dyn Appender, metrics: &WriterMetrics) {
        let result = panic::catch_unwind(AssertUnwindSafe(|| appender.flush()));

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                metrics.record_write_failure();
                eprintln!("[LOGGER ERROR] Appender '{}' flush failed: {}", appender.name(), e);
            }
            Err(panic_info) => {
                metrics.record_write_failure();
                eprintln!(
                    "[LOGGER CRITICAL] Appender '{}' panicked during flush: {}",
                    appender.name(),
                    panic_message(panic_info.as_ref())
                );
            }
        }
    }

    /// Report the first failure and every thousandth after it
    fn should_report(previous_failures: u64) -> bool {
        previous_failures == 0 || (previous_failures + 1) % 1000 == 0
    }

    /// Whether a line at `level` would be written
    ///
    /// Check this before building an expensive message.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= *self.min_level.read()
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    /// Format and submit one line
    ///
    /// Below-threshold levels return before any formatting. In async mode
    /// this blocks while the queue is full; after shutdown the line is
    /// dropped and counted as rejected.
    pub fn write(&self, level: LogLevel, message: impl Into<String>) {
        if !self.enabled(level) {
            self.metrics.record_filtered();
            return;
        }
        self.submit(level, message.into(), false);
    }

    /// Like [`write`](Self::write), but the message is only built when the
    /// level passes the threshold
    pub fn write_with<F>(&self, level: LogLevel, message: F)
    where
        F: FnOnce() -> String,
    {
        if !self.enabled(level) {
            self.metrics.record_filtered();
            return;
        }
        self.submit(level, message(), false);
    }

    /// Submit a line ahead of everything already queued
    ///
    /// In sync mode this is the same as [`write`](Self::write).
    pub fn write_urgent(&self, level: LogLevel, message: impl Into<String>) {
        if !self.enabled(level) {
            self.metrics.record_filtered();
            return;
        }
        self.submit(level, message.into(), true);
    }

    fn submit(&self, level: LogLevel, message: String, urgent: bool) {
        match &self.backend {
            Backend::Async(backend) => {
                let line = LogEntry::new(level, message).to_line(&self.timestamp_format);
                if backend.queue.is_full() {
                    self.metrics.record_block();
                }

                let pushed = if urgent {
                    backend.queue.push_front(line)
                } else {
                    backend.queue.push_back(line)
                };

                match pushed {
                    Ok(()) => {
                        backend.accepted.fetch_add(1, Ordering::AcqRel);
                        self.metrics.record_accepted();
                    }
                    Err(_) => {
                        self.metrics.record_rejected();
                    }
                }
            }
            Backend::Sync(slot) => {
                let mut slot = slot.lock();
                match slot.as_mut() {
                    Some(appender) => {
                        // Stamped under the lock so file order matches time order
                        let line = LogEntry::new(level, message).to_line(&self.timestamp_format);
                        self.metrics.record_accepted();
                        Self::append_isolated(appender.as_mut(), &line, &self.metrics);
                    }
                    None => {
                        self.metrics.record_rejected();
                    }
                }
            }
        }
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.write(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.write(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.write(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.write(LogLevel::Error, message);
    }

    /// Wait until every line accepted before this call is on disk
    ///
    /// Uses [`DEFAULT_FLUSH_TIMEOUT`]. Returns immediately once the writer has
    /// shut down.
    ///
    /// # Errors
    ///
    /// [`LoggerError::FlushTimeout`] if the writer did not catch up in time,
    /// or the appender's error in sync mode.
    pub fn flush(&self) -> Result<()> {
        self.flush_timeout(DEFAULT_FLUSH_TIMEOUT)
    }

    /// [`flush`](Self::flush) with a custom upper bound
    pub fn flush_timeout(&self, timeout: Duration) -> Result<()> {
        match &self.backend {
            Backend::Async(backend) => {
                let target = backend.accepted.load(Ordering::Acquire);
                backend
                    .progress
                    .wait_for(target, timeout)
                    .map_err(|pending| LoggerError::flush_timeout(timeout, pending))
            }
            Backend::Sync(slot) => match slot.lock().as_mut() {
                Some(appender) => appender.flush(),
                None => Ok(()),
            },
        }
    }

    /// Stop the writer and release the output
    ///
    /// Closes the queue according to the [`ClosePolicy`], waking every
    /// producer blocked on a full queue, then joins the writer thread and
    /// flushes the appender. Safe to call more than once and safe to call
    /// when nothing was ever written.
    ///
    /// # Returns
    ///
    /// `true` if the writer stopped cleanly (or was already stopped),
    /// `false` if the thread panicked or the final flush failed
    pub fn shutdown(&self) -> bool {
        match &self.backend {
            Backend::Async(backend) => {
                let discarded = match self.close_policy {
                    ClosePolicy::Discard => backend.queue.close(),
                    ClosePolicy::Drain => {
                        backend.queue.close_draining();
                        0
                    }
                };
                if discarded > 0 {
                    self.metrics.record_discarded(discarded as u64);
                }

                // Held until the thread is joined so concurrent callers wait too
                let mut worker = backend.worker.lock();
                let Some(handle) = worker.take() else {
                    return true;
                };

                match handle.join() {
                    Ok(mut appender) => {
                        if let Err(e) = appender.flush() {
                            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
                            return false;
                        }
                        true
                    }
                    Err(panic_info) => {
                        eprintln!(
                            "[LOGGER ERROR] Log writer thread panicked during shutdown: {}",
                            panic_message(panic_info.as_ref())
                        );
                        false
                    }
                }
            }
            Backend::Sync(slot) => {
                let mut slot = slot.lock();
                let Some(mut appender) = slot.take() else {
                    return true;
                };
                if let Err(e) = appender.flush() {
                    eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
                    return false;
                }
                true
            }
        }
    }

    pub fn is_shut_down(&self) -> bool {
        match &self.backend {
            Backend::Async(backend) => backend.queue.is_closed(),
            Backend::Sync(slot) => slot.lock().is_none(),
        }
    }

    pub fn mode(&self) -> WriteMode {
        match self.backend {
            Backend::Async(_) => WriteMode::Async,
            Backend::Sync(_) => WriteMode::Sync,
        }
    }

    /// Lines waiting in the queue (always `0` in sync mode)
    pub fn pending(&self) -> usize {
        match &self.backend {
            Backend::Async(backend) => backend.queue.len(),
            Backend::Sync(_) => 0,
        }
    }

    /// Queue capacity, `None` in sync mode
    pub fn capacity(&self) -> Option<usize> {
        match &self.backend {
            Backend::Async(backend) => Some(backend.queue.capacity()),
            Backend::Sync(_) => None,
        }
    }

    pub fn close_policy(&self) -> ClosePolicy {
        self.close_policy
    }

    /// Counters for observability
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rust_blocking_logger::AsyncLogWriter;
    ///
    /// let writer = AsyncLogWriter::builder().build().unwrap();
    /// writer.info("hello");
    /// writer.flush().unwrap();
    ///
    /// let metrics = writer.metrics();
    /// println!("written: {}", metrics.lines_written());
    /// println!("loss rate: {:.2}%", metrics.loss_rate());
    /// ```
    pub fn metrics(&self) -> &WriterMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn builder() -> AsyncLogWriterBuilder {
        AsyncLogWriterBuilder::new()
    }
}

impl Drop for AsyncLogWriter {
    fn drop(&mut self) {
        if !self.shutdown() {
            eprintln!("[LOGGER WARNING] Log writer did not shut down cleanly");
        }

        let discarded = self.metrics.lines_discarded();
        if discarded > 0 {
            eprintln!(
                "[LOGGER WARNING] Log writer shut down with {} discarded lines (loss rate: {:.2}%)",
                discarded,
                self.metrics.loss_rate()
            );
        }
    }
}

fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for constructing an [`AsyncLogWriter`] with a fluent API
///
/// # Example
/// ```no_run
/// use rust_blocking_logger::prelude::*;
/// use std::time::Duration;
///
/// let writer = AsyncLogWriter::builder()
///     .min_level(LogLevel::Debug)
///     .async_mode(500)
///     .directory("/var/log/myapp")
///     .max_lines(10_000)
///     .close_policy(ClosePolicy::Drain)
///     .flush_interval(Duration::from_millis(50))
///     .build()
///     .unwrap();
/// ```
pub struct AsyncLogWriterBuilder {
    config: LoggerConfig,
    appender: Option<Box<dyn Appender>>,
}

impl AsyncLogWriterBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            appender: None,
        }
    }

    /// Start from an existing configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn mode(mut self, mode: WriteMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Enable async mode with specified queue capacity
    #[must_use = "builder methods return a new value"]
    pub fn async_mode(mut self, capacity: usize) -> Self {
        self.config.mode = WriteMode::Async;
        self.config.capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sync_mode(mut self) -> Self {
        self.config.mode = WriteMode::Sync;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config.directory = directory.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn base_name(mut self, base_name: impl Into<String>) -> Self {
        self.config.base_name = base_name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_lines(mut self, max_lines: u64) -> Self {
        self.config.max_lines = max_lines;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn rotate_daily(mut self, enabled: bool) -> Self {
        self.config.rotate_daily = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn close_policy(mut self, policy: ClosePolicy) -> Self {
        self.config.close_policy = policy;
        self
    }

    /// Idle interval after which the writer flushes; rounded to milliseconds
    #[must_use = "builder methods return a new value"]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.config.flush_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.config.timestamp_format = format;
        self
    }

    /// Send lines to a custom appender instead of the rotating file
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appender = Some(Box::new(appender));
        self
    }

    /// Build the writer
    ///
    /// # Errors
    ///
    /// See [`AsyncLogWriter::new`].
    pub fn build(self) -> Result<AsyncLogWriter> {
        match self.appender {
            Some(appender) => AsyncLogWriter::with_appender(self.config, appender),
            None => AsyncLogWriter::new(self.config),
        }
    }
}

impl Default for AsyncLogWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crossbeam_channel::{bounded, Receiver, Sender};
    use std::sync::atomic::AtomicBool;

    /// Holds the first line until released, so tests can stall the writer
    struct GateAppender {
        inner: MemoryAppender,
        entered: Sender<()>,
        release: Receiver<()>,
        gated: bool,
    }

    impl GateAppender {
        fn new(inner: MemoryAppender) -> (Self, Receiver<()>, Sender<()>) {
            let (entered_tx, entered_rx) = bounded(1);
            let (release_tx, release_rx) = bounded(1);
            let gate = Self {
                inner,
                entered: entered_tx,
                release: release_rx,
                gated: true,
            };
            (gate, entered_rx, release_tx)
        }
    }

    impl Appender for GateAppender {
        fn append_line(&mut self, line: &str) -> Result<()> {
            if self.gated {
                self.gated = false;
                let _ = self.entered.send(());
                let _ = self.release.recv();
            }
            self.inner.append_line(line)
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "GateAppender"
        }
    }

    struct FlakyAppender {
        inner: MemoryAppender,
    }

    impl Appender for FlakyAppender {
        fn append_line(&mut self, line: &str) -> Result<()> {
            if line.contains("boom") {
                panic!("appender exploded");
            }
            if line.contains("bad") {
                return Err(LoggerError::writer("simulated failure"));
            }
            self.inner.append_line(line)
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "FlakyAppender"
        }
    }

    fn messages(memory: &MemoryAppender) -> Vec<String> {
        memory
            .lines()
            .iter()
            .map(|line| line.rsplit(" : ").next().unwrap().trim_end().to_string())
            .collect()
    }

    #[test]
    fn test_sync_mode_writes_immediately() {
        let memory = MemoryAppender::new();
        let writer = AsyncLogWriter::builder()
            .sync_mode()
            .appender(memory.clone())
            .build()
            .unwrap();

        writer.info("hello");
        assert_eq!(writer.mode(), WriteMode::Sync);
        assert_eq!(writer.capacity(), None);
        assert_eq!(messages(&memory), vec!["hello"]);
        assert!(memory.lines()[0].contains("[INFO]"));
    }

    #[test]
    fn test_level_filtering_skips_formatting() {
        let memory = MemoryAppender::new();
        let writer = AsyncLogWriter::builder()
            .sync_mode()
            .min_level(LogLevel::Warn)
            .appender(memory.clone())
            .build()
            .unwrap();

        let built = AtomicBool::new(false);
        writer.write_with(LogLevel::Info, || {
            built.store(true, Ordering::Relaxed);
            "expensive".to_string()
        });
        writer.debug("quiet");
        writer.error("loud");

        assert!(!built.load(Ordering::Relaxed));
        assert_eq!(writer.metrics().lines_filtered(), 2);
        assert_eq!(messages(&memory), vec!["loud"]);

        writer.set_min_level(LogLevel::Debug);
        assert!(writer.enabled(LogLevel::Debug));
        assert_eq!(writer.min_level(), LogLevel::Debug);
    }

    #[test]
    fn test_async_flush_persists_in_order() {
        let memory = MemoryAppender::new();
        let writer = AsyncLogWriter::builder()
            .async_mode(16)
            .appender(memory.clone())
            .build()
            .unwrap();

        for i in 0..100 {
            writer.info(format!("line {}", i));
        }
        writer.flush().unwrap();

        let expected: Vec<String> = (0..100).map(|i| format!("line {}", i)).collect();
        assert_eq!(messages(&memory), expected);
        assert_eq!(writer.metrics().lines_written(), 100);
        assert_eq!(writer.pending(), 0);
    }

    #[test]
    fn test_urgent_line_jumps_the_queue() {
        let memory = MemoryAppender::new();
        let (gate, entered, release) = GateAppender::new(memory.clone());
        let writer = AsyncLogWriter::builder()
            .async_mode(8)
            .appender(gate)
            .build()
            .unwrap();

        writer.info("first");
        entered.recv().unwrap();

        writer.info("a");
        writer.info("b");
        writer.write_urgent(LogLevel::Error, "urgent");
        release.send(()).unwrap();
        writer.flush().unwrap();

        assert_eq!(messages(&memory), vec!["first", "urgent", "a", "b"]);
    }

    #[test]
    fn test_failures_do_not_stop_the_writer() {
        let memory = MemoryAppender::new();
        let writer = AsyncLogWriter::builder()
            .async_mode(8)
            .appender(FlakyAppender {
                inner: memory.clone(),
            })
            .build()
            .unwrap();

        writer.info("good 1");
        writer.info("bad");
        writer.info("boom");
        writer.info("good 2");
        writer.flush().unwrap();

        assert_eq!(messages(&memory), vec!["good 1", "good 2"]);
        assert_eq!(writer.metrics().write_failures(), 2);
        assert_eq!(writer.metrics().lines_written(), 2);
        assert!(writer.shutdown());
    }

    #[test]
    fn test_producer_blocks_when_queue_full() {
        let memory = MemoryAppender::new();
        let (gate, entered, release) = GateAppender::new(memory.clone());
        let writer = Arc::new(
            AsyncLogWriter::builder()
                .async_mode(1)
                .appender(gate)
                .build()
                .unwrap(),
        );

        writer.info("first");
        entered.recv().unwrap();
        writer.info("second");

        let producer = {
            let writer = Arc::clone(&writer);
            thread::spawn(move || writer.info("third"))
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!producer.is_finished());
        assert!(writer.metrics().block_events() >= 1);

        release.send(()).unwrap();
        producer.join().unwrap();
        writer.flush().unwrap();

        assert_eq!(messages(&memory), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_shutdown_discards_backlog() {
        let memory = MemoryAppender::new();
        let (gate, entered, release) = GateAppender::new(memory.clone());
        let writer = AsyncLogWriter::builder()
            .async_mode(8)
            .appender(gate)
            .build()
            .unwrap();

        writer.info("first");
        entered.recv().unwrap();
        for i in 0..5 {
            writer.info(format!("queued {}", i));
        }

        let releaser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            let _ = release.send(());
        });

        assert!(writer.shutdown());
        releaser.join().unwrap();

        assert_eq!(messages(&memory), vec!["first"]);
        assert_eq!(writer.metrics().lines_discarded(), 5);
        assert!(writer.is_shut_down());
    }

    #[test]
    fn test_shutdown_drains_backlog() {
        let memory = MemoryAppender::new();
        let (gate, entered, release) = GateAppender::new(memory.clone());
        let writer = AsyncLogWriter::builder()
            .async_mode(8)
            .close_policy(ClosePolicy::Drain)
            .appender(gate)
            .build()
            .unwrap();

        writer.info("first");
        entered.recv().unwrap();
        for i in 0..3 {
            writer.info(format!("queued {}", i));
        }

        let releaser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            let _ = release.send(());
        });

        assert!(writer.shutdown());
        releaser.join().unwrap();

        assert_eq!(
            messages(&memory),
            vec!["first", "queued 0", "queued 1", "queued 2"]
        );
        assert_eq!(writer.metrics().lines_discarded(), 0);
    }

    #[test]
    fn test_shutdown_is_idempotent_and_rejects_later_writes() {
        for mode in [WriteMode::Async, WriteMode::Sync] {
            let memory = MemoryAppender::new();
            let writer = AsyncLogWriter::builder()
                .mode(mode)
                .appender(memory.clone())
                .build()
                .unwrap();

            assert!(writer.shutdown());
            assert!(writer.shutdown());
            assert!(writer.is_shut_down());

            writer.info("too late");
            assert_eq!(writer.metrics().lines_rejected(), 1);
            assert!(memory.is_empty());
            assert!(writer.flush().is_ok());
        }
    }

    #[test]
    fn test_concurrent_shutdown_waits_for_writer() {
        let memory = MemoryAppender::new();
        let (gate, entered, release) = GateAppender::new(memory.clone());
        let writer = Arc::new(
            AsyncLogWriter::builder()
                .async_mode(8)
                .close_policy(ClosePolicy::Drain)
                .appender(gate)
                .build()
                .unwrap(),
        );

        writer.info("first");
        entered.recv().unwrap();
        writer.info("second");

        let callers: Vec<_> = (0..2)
            .map(|_| {
                let writer = Arc::clone(&writer);
                let memory = memory.clone();
                thread::spawn(move || {
                    let clean = writer.shutdown();
                    (clean, memory.len())
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        assert!(
            callers.iter().all(|caller| !caller.is_finished()),
            "no caller returns while the writer thread is still running"
        );

        release.send(()).unwrap();
        for caller in callers {
            assert_eq!(caller.join().unwrap(), (true, 2));
        }
    }

    #[test]
    fn test_sync_mode_lines_in_time_order() {
        let memory = MemoryAppender::new();
        let writer = Arc::new(
            AsyncLogWriter::builder()
                .sync_mode()
                .appender(memory.clone())
                .build()
                .unwrap(),
        );

        let producers: Vec<_> = (0..8)
            .map(|producer| {
                let writer = Arc::clone(&writer);
                thread::spawn(move || {
                    for i in 0..200 {
                        writer.info(format!("p{} {}", producer, i));
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        // The default stamp sorts lexicographically
        let stamps: Vec<String> = memory.lines().iter().map(|line| line[..26].to_string()).collect();
        assert_eq!(stamps.len(), 1600);
        assert!(stamps.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_unrenderable_timestamp_fails_at_build() {
        for mode in [WriteMode::Async, WriteMode::Sync] {
            let result = AsyncLogWriter::builder()
                .mode(mode)
                .timestamp_format(TimestampFormat::Custom("%Q".to_string()))
                .appender(MemoryAppender::new())
                .build();
            assert!(matches!(
                result,
                Err(LoggerError::InvalidConfiguration { .. })
            ));
        }
    }

    #[test]
    fn test_invalid_capacity_fails_fast() {
        let result = AsyncLogWriter::builder()
            .async_mode(0)
            .appender(MemoryAppender::new())
            .build();
        assert!(matches!(
            result,
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_flush_progress_times_out() {
        let progress = FlushProgress::new();
        assert_eq!(progress.wait_for(3, Duration::from_millis(20)), Err(3));

        progress.advance(3);
        assert_eq!(progress.wait_for(3, Duration::from_millis(20)), Ok(()));

        progress.finish(0);
        assert_eq!(progress.wait_for(100, Duration::from_millis(20)), Ok(()));
    }

    #[test]
    fn test_should_report_throttles() {
        assert!(AsyncLogWriter::should_report(0));
        assert!(!AsyncLogWriter::should_report(1));
        assert!(AsyncLogWriter::should_report(999));
        assert!(!AsyncLogWriter::should_report(1000));
    }
}
