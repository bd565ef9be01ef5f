//! Process-wide writer access
//!
//! [`Singleton`] is a one-time initializer usable in a `static`. The functions
//! in this module manage the crate's own global [`AsyncLogWriter`].
//!
//! Statics are never dropped, so a program using the global writer should call
//! [`shutdown`] before exiting to persist what is still queued.

use super::config::LoggerConfig;
use super::error::{LoggerError, Result};
use super::logger::AsyncLogWriter;
use parking_lot::Mutex;
use std::convert::Infallible;
use std::fmt;
use std::sync::OnceLock;

/// Lazily created value, initialized at most once across all threads
///
/// # Example
///
/// ```
/// use rust_blocking_logger::core::global::Singleton;
///
/// static COUNTER_NAME: Singleton<String> = Singleton::new();
///
/// let name = COUNTER_NAME.get_or_init(|| "requests".to_string());
/// assert_eq!(name, "requests");
/// assert_eq!(COUNTER_NAME.get().map(String::as_str), Some("requests"));
/// ```
pub struct Singleton<T> {
    cell: OnceLock<T>,
    /// Serializes fallible initializers so a failed attempt can be retried
    init_lock: Mutex<()>,
}

impl<T> Singleton<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            init_lock: parking_lot::const_mutex(()),
        }
    }

    /// The value, if it has been created
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Return the value, creating it with `init` on first use
    pub fn get_or_init<F>(&self, init: F) -> &T
    where
        F: FnOnce() -> T,
    {
        match self.get_or_try_init(|| Ok::<T, Infallible>(init())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Return the value, creating it with `init` on first use
    ///
    /// `init` runs on at most one thread at a time. If it fails the error is
    /// returned and the next caller tries again.
    pub fn get_or_try_init<F, E>(&self, init: F) -> std::result::Result<&T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
    {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }

        let _guard = self.init_lock.lock();
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }

        let value = init()?;
        Ok(self.cell.get_or_init(|| value))
    }
}

impl<T> Default for Singleton<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Singleton<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Singleton").field("value", &self.cell.get()).finish()
    }
}

static WRITER: Singleton<AsyncLogWriter> = Singleton::new();

/// Create the global writer from `config`
///
/// # Errors
///
/// [`LoggerError::AlreadyInitialized`] if the global writer already exists,
/// or any error from [`AsyncLogWriter::new`].
pub fn init(config: LoggerConfig) -> Result<&'static AsyncLogWriter> {
    let mut created = false;
    let writer = WRITER.get_or_try_init(|| {
        created = true;
        AsyncLogWriter::new(config)
    })?;

    if created {
        Ok(writer)
    } else {
        Err(LoggerError::AlreadyInitialized)
    }
}

/// The global writer, created with [`LoggerConfig::default`] on first use
///
/// # Errors
///
/// Any error from [`AsyncLogWriter::new`], e.g. when `./log` cannot be created.
pub fn instance() -> Result<&'static AsyncLogWriter> {
    WRITER.get_or_try_init(|| AsyncLogWriter::new(LoggerConfig::default()))
}

/// The global writer, if it has been created
pub fn get() -> Option<&'static AsyncLogWriter> {
    WRITER.get()
}

/// Shut the global writer down
///
/// Returns `true` when there is nothing to shut down. Later writes through the
/// global writer are counted as rejected.
pub fn shutdown() -> bool {
    match WRITER.get() {
        Some(writer) => writer.shutdown(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_get_before_init_is_none() {
        let cell: Singleton<u32> = Singleton::new();
        assert!(cell.get().is_none());
        assert!(!cell.is_initialized());
    }

    #[test]
    fn test_initializer_runs_once_across_threads() {
        let cell: Arc<Singleton<usize>> = Arc::new(Singleton::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cell = Arc::clone(&cell);
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    *cell.get_or_init(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        i
                    })
                })
            })
            .collect();

        let seen: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(seen.iter().all(|v| *v == seen[0]));
    }

    #[test]
    fn test_failed_initializer_can_be_retried() {
        let cell: Singleton<String> = Singleton::new();

        let err = cell.get_or_try_init(|| Err::<String, _>("not yet"));
        assert_eq!(err, Err("not yet"));
        assert!(!cell.is_initialized());

        let value = cell.get_or_try_init(|| Ok::<_, &str>("ready".to_string()));
        assert_eq!(value.map(String::as_str), Ok("ready"));

        // Already set; the initializer is not consulted
        let value = cell.get_or_try_init(|| Err::<String, _>("ignored"));
        assert_eq!(value.map(String::as_str), Ok("ready"));
    }
}
