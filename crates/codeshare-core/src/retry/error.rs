//! Error types for the resilient executor
//!
//! `AttemptError` describes why a single attempt failed and never leaves the
//! executor on its own. `RetryError` is the only error a caller sees: it is
//! returned once every attempt has been consumed and carries the last
//! attempt's error.

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Why a single attempt failed
#[derive(Debug)]
pub enum AttemptError<E> {
    /// The attempt did not settle within its timeout
    Timeout {
        /// The timeout that was exceeded
        timeout: Duration,
    },

    /// The operation itself failed
    Failed(E),
}

impl<E> AttemptError<E> {
    /// Check if the attempt timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, AttemptError::Timeout { .. })
    }

    /// The operation's error, if the attempt did not time out
    pub fn source_ref(&self) -> Option<&E> {
        match self {
            AttemptError::Failed(source) => Some(source),
            AttemptError::Timeout { .. } => None,
        }
    }

    /// Get the operation's error, consuming this error
    pub fn into_source(self) -> Option<E> {
        match self {
            AttemptError::Failed(source) => Some(source),
            AttemptError::Timeout { .. } => None,
        }
    }

    /// Map the operation's error type using a closure
    pub fn map_err<F, E2>(self, f: F) -> AttemptError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            AttemptError::Timeout { timeout } => AttemptError::Timeout { timeout },
            AttemptError::Failed(source) => AttemptError::Failed(f(source)),
        }
    }
}

impl<E: fmt::Display> fmt::Display for AttemptError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Timeout { timeout } => {
                write!(f, "operation timed out after {}ms", timeout.as_millis())
            }
            AttemptError::Failed(source) => write!(f, "{}", source),
        }
    }
}

impl<E: Error + 'static> Error for AttemptError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AttemptError::Failed(source) => Some(source),
            AttemptError::Timeout { .. } => None,
        }
    }
}

/// All attempts were consumed without a success
#[derive(Debug)]
pub struct RetryError<E> {
    attempts: u32,
    last_error: AttemptError<E>,
    total_duration: Duration,
}

impl<E> RetryError<E> {
    /// Create a new exhausted-retries error
    pub fn exhausted(attempts: u32, last_error: AttemptError<E>, total_duration: Duration) -> Self {
        Self {
            attempts,
            last_error,
            total_duration,
        }
    }

    /// Number of attempts made before giving up
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The error from the final attempt
    pub fn last_error(&self) -> &AttemptError<E> {
        &self.last_error
    }

    /// Total time spent across attempts and backoff delays
    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// Check if the final attempt timed out
    pub fn is_timeout(&self) -> bool {
        self.last_error.is_timeout()
    }

    /// Get the final attempt's error, consuming this error
    pub fn into_last_error(self) -> AttemptError<E> {
        self.last_error
    }

    /// Map the error type using a closure
    pub fn map_err<F, E2>(self, f: F) -> RetryError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        RetryError {
            attempts: self.attempts,
            last_error: self.last_error.map_err(f),
            total_duration: self.total_duration,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "operation failed after {} attempts over {:.2}s. Last error: {}",
            self.attempts,
            self.total_duration.as_secs_f64(),
            self.last_error
        )
    }
}

impl<E: Error + 'static> Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.last_error)
    }
}
