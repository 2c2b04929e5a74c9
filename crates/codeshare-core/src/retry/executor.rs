//! Resilient executor
//!
//! Runs an operation under a `RetryPolicy`: each attempt is raced against a
//! timeout, failed attempts are followed by a backoff sleep, and the call
//! ends with the first success or with a `RetryError` once
//! `max_attempts` attempts have failed.

use std::error::Error;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::types::RetryPolicy;

use super::error::{AttemptError, RetryError};
use super::observer::{NoOpObserver, RetryObserver};
use super::strategies::calculate_delay;

/// Execute an async operation under the default policy
///
/// Five attempts, 10s per attempt, 2s/4s/8s/16s between attempts.
///
/// # Example
///
/// ```rust,no_run
/// use codeshare_core::retry::execute_with_retry;
///
/// async fn example() {
///     let result = execute_with_retry(|| async {
///         Ok::<_, std::io::Error>("saved")
///     })
///     .await;
/// }
/// ```
pub async fn execute_with_retry<F, Fut, T, E>(op: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    ResilientExecutor::new(RetryPolicy::default())
        .execute(op)
        .await
}

/// Builder for configuring a `ResilientExecutor`
///
/// # Example
///
/// ```rust
/// use codeshare_core::retry::{ResilientExecutorBuilder, TracingObserver};
/// use codeshare_core::types::RetryPolicy;
///
/// let executor = ResilientExecutorBuilder::new()
///     .with_policy(RetryPolicy::default())
///     .with_observer(TracingObserver::new("save"))
///     .build();
/// ```
pub struct ResilientExecutorBuilder<O = NoOpObserver> {
    policy: RetryPolicy,
    observer: O,
}

impl Default for ResilientExecutorBuilder<NoOpObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl ResilientExecutorBuilder<NoOpObserver> {
    /// Create a new builder with the default policy
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
            observer: NoOpObserver,
        }
    }
}

impl<O> ResilientExecutorBuilder<O> {
    /// Set the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the observer
    pub fn with_observer<O2>(self, observer: O2) -> ResilientExecutorBuilder<O2> {
        ResilientExecutorBuilder {
            policy: self.policy,
            observer,
        }
    }

    /// Build the executor
    pub fn build(self) -> ResilientExecutor<O> {
        ResilientExecutor {
            policy: self.policy,
            observer: self.observer,
        }
    }
}

/// Bounded-retry, exponential-backoff, per-attempt-timeout executor
///
/// The executor holds only its immutable policy and an observer, so a single
/// instance can be shared by concurrent calls. All per-call state (attempt
/// counter, last error) lives inside `execute_with_timeout`.
pub struct ResilientExecutor<O = NoOpObserver> {
    policy: RetryPolicy,
    observer: O,
}

impl ResilientExecutor<NoOpObserver> {
    /// Create an executor for `policy` without an observer
    pub fn new(policy: RetryPolicy) -> Self {
        ResilientExecutorBuilder::new().with_policy(policy).build()
    }
}

impl<O> ResilientExecutor<O> {
    /// The policy this executor runs under
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<O> ResilientExecutor<O>
where
    O: RetryObserver,
{
    /// Execute an operation using the policy's per-attempt timeout
    pub async fn execute<F, Fut, T, E>(&self, op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        self.execute_with_timeout(op, self.policy.attempt_timeout())
            .await
    }

    /// Execute an operation with an explicit per-attempt timeout
    ///
    /// `op` is called once per attempt. When an attempt times out its future
    /// is dropped, which cancels whatever it was awaiting.
    pub async fn execute_with_timeout<F, Fut, T, E>(
        &self,
        mut op: F,
        timeout: Duration,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            self.observer.on_attempt_start(attempt, max_attempts);

            let failure = match tokio::time::timeout(timeout, op()).await {
                Ok(Ok(value)) => {
                    self.observer.on_success(attempt, start.elapsed());
                    return Ok(value);
                }
                Ok(Err(err)) => AttemptError::Failed(err),
                Err(_) => AttemptError::Timeout { timeout },
            };

            let display_err = DisplayError(failure.to_string());

            if attempt >= max_attempts {
                self.observer.on_exhausted(attempt, &display_err);
                return Err(RetryError::exhausted(attempt, failure, start.elapsed()));
            }

            let delay = calculate_delay(&self.policy, attempt);
            self.observer.on_attempt_failed(attempt, &display_err, delay);

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            attempt += 1;
        }
    }
}

/// Adapts a Display-only error to `dyn Error` for observer callbacks
#[derive(Debug)]
struct DisplayError(String);

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for DisplayError {}
