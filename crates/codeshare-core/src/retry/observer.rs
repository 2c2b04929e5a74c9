//! Retry observation and logging
//!
//! This module provides the `RetryObserver` trait for monitoring attempts
//! and a `TracingObserver` implementation that logs using the `tracing` crate.

use std::error::Error;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Observer trait for attempt events
///
/// Implement this trait to receive callbacks while the executor runs.
/// Observers only watch; they cannot change the outcome of a call.
///
/// # Example
///
/// ```rust
/// use codeshare_core::retry::RetryObserver;
/// use std::error::Error;
/// use std::time::Duration;
///
/// struct MetricsObserver;
///
/// impl RetryObserver for MetricsObserver {
///     fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {}
///     fn on_attempt_failed(&self, attempt: u32, error: &dyn Error, delay: Duration) {}
///     fn on_success(&self, attempt: u32, total_duration: Duration) {}
///     fn on_exhausted(&self, attempts: u32, final_error: &dyn Error) {}
/// }
/// ```
pub trait RetryObserver: Send + Sync {
    /// Called when an attempt is about to start
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number (1-indexed)
    /// * `max_attempts` - The maximum number of attempts configured
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32);

    /// Called when an attempt fails (or times out) and will be retried
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number that failed (1-indexed)
    /// * `error` - The error that caused the failure
    /// * `delay` - The backoff before the next attempt
    fn on_attempt_failed(&self, attempt: u32, error: &dyn Error, delay: Duration);

    /// Called when the operation succeeds
    fn on_success(&self, attempt: u32, total_duration: Duration);

    /// Called when the final attempt fails
    fn on_exhausted(&self, attempts: u32, final_error: &dyn Error);
}

/// A no-op observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl RetryObserver for NoOpObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {}

    fn on_attempt_failed(&self, _attempt: u32, _error: &dyn Error, _delay: Duration) {}

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {}

    fn on_exhausted(&self, _attempts: u32, _final_error: &dyn Error) {}
}

/// An observer that logs attempt events using the `tracing` crate
///
/// # Log Levels
///
/// - `on_attempt_start`: DEBUG
/// - `on_attempt_failed`: WARN
/// - `on_success`: INFO (if > 1 attempt) or DEBUG (first attempt)
/// - `on_exhausted`: ERROR
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Name of the operation being retried (for log context)
    operation: String,
}

impl TracingObserver {
    /// Create a new tracing observer
    ///
    /// # Arguments
    ///
    /// * `operation` - A descriptive name for the operation, e.g. "save"
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    /// Get the operation name
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("remote")
    }
}

impl RetryObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            max_attempts = max_attempts,
            "starting attempt"
        );
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn Error, delay: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            error = %error,
            delay_ms = delay.as_millis() as u64,
            "attempt failed, will retry"
        );
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt = attempt,
                total_duration_ms = total_duration.as_millis() as u64,
                "succeeded after retry"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                duration_ms = total_duration.as_millis() as u64,
                "succeeded on first attempt"
            );
        }
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Error) {
        tracing::error!(
            operation = %self.operation,
            attempts = attempts,
            error = %final_error,
            "all attempts exhausted"
        );
    }
}

/// An observer that counts events
///
/// Useful for tests and for surfacing attempt counts in diagnostics.
#[derive(Debug, Default)]
pub struct StatsObserver {
    attempt_starts: AtomicU32,
    failures: AtomicU32,
    successes: AtomicU32,
    exhaustions: AtomicU32,
}

impl StatsObserver {
    /// Create a new stats observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of attempt starts
    pub fn attempt_starts(&self) -> u32 {
        self.attempt_starts.load(Ordering::SeqCst)
    }

    /// Get the number of retried failures
    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    /// Get the number of successes
    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    /// Get the number of exhaustions
    pub fn exhaustions(&self) -> u32 {
        self.exhaustions.load(Ordering::SeqCst)
    }
}

impl RetryObserver for StatsObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {
        self.attempt_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_attempt_failed(&self, _attempt: u32, _error: &dyn Error, _delay: Duration) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exhausted(&self, _attempts: u32, _final_error: &dyn Error) {
        self.exhaustions.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: RetryObserver + ?Sized> RetryObserver for std::sync::Arc<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn Error, delay: Duration) {
        (**self).on_attempt_failed(attempt, error, delay)
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        (**self).on_success(attempt, total_duration)
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Error) {
        (**self).on_exhausted(attempts, final_error)
    }
}
