//! Scenario tests for the resilient executor
//!
//! All tests run on a paused tokio clock, so backoff sleeps and attempt
//! timeouts complete instantly while `Instant` still reports the virtual
//! time that elapsed.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use crate::retry::error::RetryError;
use crate::retry::executor::{execute_with_retry, ResilientExecutor, ResilientExecutorBuilder};
use crate::retry::observer::{RetryObserver, StatsObserver};
use crate::types::{RetryPolicy, RetryStrategy};

/// Slack allowed when comparing virtual-time durations
const EPSILON: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, PartialEq)]
struct NetworkError(String);

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NetworkError {}

/// An operation that fails a fixed number of times, then succeeds
///
/// Records the virtual instant at which every attempt started.
#[derive(Clone)]
struct FlakyOperation {
    failures_before_success: u32,
    calls: Arc<AtomicU32>,
    started_at: Arc<Mutex<Vec<Instant>>>,
}

impl FlakyOperation {
    fn new(failures_before_success: u32) -> Self {
        Self {
            failures_before_success,
            calls: Arc::new(AtomicU32::new(0)),
            started_at: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn always_failing() -> Self {
        Self::new(u32::MAX)
    }

    async fn call(&self) -> Result<&'static str, NetworkError> {
        self.started_at.lock().unwrap().push(Instant::now());
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures_before_success {
            Err(NetworkError("network error".to_string()))
        } else {
            Ok("snippet-id")
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Gaps between consecutive attempt starts
    fn gaps(&self) -> Vec<Duration> {
        let started = self.started_at.lock().unwrap();
        started.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

/// Observer that records every backoff delay the executor announces
#[derive(Default)]
struct DelayRecorder {
    delays: Mutex<Vec<Duration>>,
}

impl RetryObserver for DelayRecorder {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {}

    fn on_attempt_failed(&self, _attempt: u32, _error: &dyn std::error::Error, delay: Duration) {
        self.delays.lock().unwrap().push(delay);
    }

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {}

    fn on_exhausted(&self, _attempts: u32, _final_error: &dyn std::error::Error) {}
}

fn assert_close(actual: Duration, expected: Duration) {
    assert!(
        actual >= expected && actual <= expected + EPSILON,
        "expected {:?} (+{:?}), got {:?}",
        expected,
        EPSILON,
        actual
    );
}

fn quick_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        strategy: RetryStrategy::ExponentialBackoff,
        backoff_multiplier: 2.0,
        initial_delay_ms: 100,
        max_delay_ms: 100_000,
        attempt_timeout_ms: 1_000,
    }
}

// ============================================================================
// Attempt counting
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_first_try_success_has_no_delay() {
    let op = FlakyOperation::new(0);
    let start = Instant::now();

    let result = execute_with_retry(|| op.call()).await;

    assert_eq!(result.unwrap(), "snippet-id");
    assert_eq!(op.calls(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_n_failures_then_success_uses_n_plus_one_attempts() {
    let policy = quick_policy(5);

    for failures in 0..policy.max_attempts {
        let op = FlakyOperation::new(failures);
        let executor = ResilientExecutor::new(policy.clone());

        let result = executor.execute(|| op.call()).await;

        assert_eq!(result.unwrap(), "snippet-id");
        assert_eq!(op.calls(), failures + 1, "failures = {}", failures);
    }
}

#[tokio::test(start_paused = true)]
async fn test_four_network_errors_then_success_waits_four_times() {
    let op = FlakyOperation::new(4);
    let observer = Arc::new(StatsObserver::new());
    let executor = ResilientExecutorBuilder::new()
        .with_observer(observer.clone())
        .build();

    let result = executor.execute(|| op.call()).await;

    assert_eq!(result.unwrap(), "snippet-id");
    assert_eq!(op.calls(), 5);
    assert_eq!(op.gaps().len(), 4);
    assert_eq!(observer.failures(), 4);
    assert_eq!(observer.successes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_five_network_errors_exhaust_default_policy() {
    let op = FlakyOperation::always_failing();

    let result = execute_with_retry(|| op.call()).await;

    let err = result.unwrap_err();
    assert_eq!(op.calls(), 5);
    assert_eq!(err.attempts(), 5);

    let message = err.to_string();
    assert!(message.contains("5 attempts"), "message: {}", message);
    assert!(message.contains("network error"), "message: {}", message);
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_keeps_last_error() {
    let calls = Arc::new(AtomicU32::new(0));

    let result: Result<(), RetryError<NetworkError>> = ResilientExecutor::new(quick_policy(3))
        .execute(|| {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Err(NetworkError(format!("failure #{}", n)))
            }
        })
        .await;

    let err = result.unwrap_err();
    assert_eq!(
        err.last_error().source_ref(),
        Some(&NetworkError("failure #3".to_string()))
    );
    assert!(err.to_string().contains("failure #3"));
}

// ============================================================================
// Backoff timing
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_default_backoff_sequence() {
    let op = FlakyOperation::always_failing();
    let recorder = Arc::new(DelayRecorder::default());
    let executor = ResilientExecutorBuilder::new()
        .with_observer(recorder.clone())
        .build();
    let start = Instant::now();

    let result = executor.execute(|| op.call()).await;
    assert!(result.is_err());

    let expected = [2_000, 4_000, 8_000, 16_000].map(Duration::from_millis);
    assert_eq!(*recorder.delays.lock().unwrap(), expected.to_vec());

    let gaps = op.gaps();
    assert_eq!(gaps.len(), expected.len());
    for (gap, expected) in gaps.iter().zip(expected) {
        assert_close(*gap, expected);
    }

    // No sleep after the final attempt
    assert_close(start.elapsed(), Duration::from_millis(30_000));
}

#[tokio::test(start_paused = true)]
async fn test_backoff_depends_only_on_attempt_index() {
    // Alternate between timeouts and errors: delays must not care
    let calls = Arc::new(AtomicU32::new(0));
    let recorder = Arc::new(DelayRecorder::default());
    let executor = ResilientExecutorBuilder::new()
        .with_policy(quick_policy(4))
        .with_observer(recorder.clone())
        .build();

    let result: Result<(), RetryError<NetworkError>> = executor
        .execute(|| {
            let calls = calls.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                    std::future::pending().await
                } else {
                    Err(NetworkError("refused".to_string()))
                }
            }
        })
        .await;

    assert_eq!(result.unwrap_err().attempts(), 4);
    assert_eq!(
        *recorder.delays.lock().unwrap(),
        [100, 200, 400].map(Duration::from_millis).to_vec()
    );
}

// ============================================================================
// Timeouts
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_never_settling_attempt_times_out_at_deadline() {
    let policy = RetryPolicy {
        max_attempts: 1,
        ..quick_policy(1)
    };
    let start = Instant::now();

    let result: Result<(), RetryError<NetworkError>> = ResilientExecutor::new(policy)
        .execute_with_timeout(
            || std::future::pending::<Result<(), NetworkError>>(),
            Duration::from_millis(750),
        )
        .await;

    let err = result.unwrap_err();
    assert!(err.is_timeout());
    assert!(err.to_string().contains("timed out"));
    assert_close(start.elapsed(), Duration::from_millis(750));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_consumes_a_retry_slot() {
    let calls = Arc::new(AtomicU32::new(0));
    let start = Instant::now();

    let result = ResilientExecutor::new(quick_policy(3))
        .execute_with_timeout(
            || {
                let calls = calls.clone();
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        // Slower than the 500ms timeout
                        tokio::time::sleep(Duration::from_secs(60)).await;
                    }
                    Ok::<_, NetworkError>("late but fine")
                }
            },
            Duration::from_millis(500),
        )
        .await;

    assert_eq!(result.unwrap(), "late but fine");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    // 500ms timeout + 100ms backoff
    assert_close(start.elapsed(), Duration::from_millis(600));
}

#[tokio::test(start_paused = true)]
async fn test_every_attempt_timing_out_reports_timeout() {
    let start = Instant::now();

    let result: Result<(), RetryError<NetworkError>> = ResilientExecutor::new(quick_policy(3))
        .execute(|| std::future::pending::<Result<(), NetworkError>>())
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.attempts(), 3);
    assert!(err.is_timeout());
    // 3 × 1000ms timeouts + 100ms + 200ms backoff
    assert_close(start.elapsed(), Duration::from_millis(3_300));
    assert_close(err.total_duration(), Duration::from_millis(3_300));
}

// ============================================================================
// Independence of calls
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_concurrent_calls_do_not_interfere() {
    let executor = ResilientExecutor::new(quick_policy(5));
    let failing = FlakyOperation::new(3);
    let healthy = FlakyOperation::new(0);
    let start = Instant::now();

    let (slow, fast) = tokio::join!(
        executor.execute(|| failing.call()),
        executor.execute(|| healthy.call()),
    );

    assert_eq!(slow.unwrap(), "snippet-id");
    assert_eq!(fast.unwrap(), "snippet-id");
    assert_eq!(failing.calls(), 4);
    assert_eq!(healthy.calls(), 1);

    // The healthy call finished immediately; the failing one waited 100+200+400
    assert_eq!(healthy.started_at.lock().unwrap()[0], start);
    let gaps = failing.gaps();
    assert_close(gaps[0], Duration::from_millis(100));
    assert_close(gaps[1], Duration::from_millis(200));
    assert_close(gaps[2], Duration::from_millis(400));
}

#[tokio::test(start_paused = true)]
async fn test_each_call_gets_a_fresh_attempt_budget() {
    let executor = ResilientExecutor::new(quick_policy(2));

    let first = FlakyOperation::always_failing();
    assert!(executor.execute(|| first.call()).await.is_err());
    assert_eq!(first.calls(), 2);

    // No circuit breaker: a call right after exhaustion still gets all attempts
    let second = FlakyOperation::new(1);
    assert_eq!(executor.execute(|| second.call()).await.unwrap(), "snippet-id");
    assert_eq!(second.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_attempts_never_overlap() {
    let in_flight = Arc::new(AtomicU32::new(0));
    let max_seen = Arc::new(AtomicU32::new(0));

    let result: Result<(), RetryError<NetworkError>> = ResilientExecutor::new(quick_policy(4))
        .execute(|| {
            let in_flight = in_flight.clone();
            let max_seen = max_seen.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Err(NetworkError("busy".to_string()))
            }
        })
        .await;

    assert!(result.is_err());
    assert_eq!(max_seen.load(Ordering::SeqCst), 1);
}
