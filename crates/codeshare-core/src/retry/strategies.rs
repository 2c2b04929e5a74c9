//! Retry delay strategies

use crate::types::{RetryPolicy, RetryStrategy};
use std::time::Duration;

/// Calculate the delay to wait after a failed attempt
///
/// # Arguments
///
/// * `policy` - The retry policy containing strategy and timing parameters
/// * `attempt` - The attempt that just failed (1-indexed)
///
/// # Example
///
/// ```rust
/// use codeshare_core::retry::calculate_delay;
/// use codeshare_core::types::RetryPolicy;
///
/// let policy = RetryPolicy::default();
///
/// assert_eq!(calculate_delay(&policy, 1).as_millis(), 2000);
/// assert_eq!(calculate_delay(&policy, 4).as_millis(), 16000);
/// ```
pub fn calculate_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    // Attempt is 1-indexed, but we want 0-indexed for calculations
    let attempt_index = attempt.saturating_sub(1);

    let base_delay_ms = match policy.strategy {
        RetryStrategy::None => 0,

        RetryStrategy::FixedDelay => policy.initial_delay_ms,

        RetryStrategy::ExponentialBackoff => {
            let multiplier = policy.backoff_multiplier.powi(attempt_index as i32);
            (policy.initial_delay_ms as f64 * multiplier) as u64
        }

        RetryStrategy::LinearBackoff => policy
            .initial_delay_ms
            .saturating_mul(attempt_index as u64 + 1),
    };

    Duration::from_millis(base_delay_ms.min(policy.max_delay_ms))
}
