//! Resilient execution of remote operations
//!
//! Every call to the snippet backend goes through this module. An operation
//! is a closure producing a fresh future per attempt; the executor races each
//! attempt against a per-attempt timeout, sleeps with exponential backoff
//! between failed attempts, and gives up after a bounded number of attempts
//! with a single aggregated error.
//!
//! # Features
//!
//! - Strictly sequential attempts, bounded by `RetryPolicy::max_attempts`
//! - Per-attempt timeout (policy default or per call)
//! - Deterministic backoff: `initial_delay × multiplier^(attempt - 1)`
//! - Observable attempts via the `RetryObserver` trait, with a built-in
//!   `TracingObserver` for logging
//! - No state shared between calls; one executor can serve many concurrent
//!   calls
//!
//! # Example
//!
//! ```rust,no_run
//! use codeshare_core::retry::{execute_with_retry, RetryError};
//!
//! async fn example() -> Result<String, RetryError<std::io::Error>> {
//!     execute_with_retry(|| async {
//!         // Your fallible remote call here
//!         Ok("saved".to_string())
//!     })
//!     .await
//! }
//! ```

mod error;
mod executor;
mod observer;
mod strategies;

pub use error::{AttemptError, RetryError};
pub use executor::{execute_with_retry, ResilientExecutor, ResilientExecutorBuilder};
pub use observer::{NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
pub use strategies::calculate_delay;

#[cfg(test)]
mod tests;
