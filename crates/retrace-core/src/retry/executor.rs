//! Retry executor: runs an operation until it succeeds or the policy is spent.

use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use super::outcome::RetryOutcome;
use super::policy::RetryPolicy;
use crate::aggregator::FailureAggregator;
use crate::failure::CapturedFailure;

/// Runs fallible operations under a [`RetryPolicy`], capturing every failure.
///
/// Each failed attempt becomes a [`CapturedFailure`] that is appended to the
/// optional [`FailureAggregator`] and to the call-local history carried by
/// the returned [`RetryOutcome`]. Attempts never overlap within one call;
/// the only suspension point is the wait between attempts, which uses
/// `tokio::time::sleep` and therefore never blocks the worker thread.
///
/// Side effects of a failed attempt are not rolled back. Operations should
/// be safe to repeat.
///
/// Dropping the returned future cancels the call at its next await point.
/// Failures recorded before that stay in the aggregator.
///
/// # Examples
///
/// ```rust
/// use retrace_core::{FailureAggregator, RetryExecutor, RetryPolicy};
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// # async fn example() {
/// let executor = RetryExecutor::new(RetryPolicy::builder().max_retries(3).build());
/// let aggregator = FailureAggregator::new();
/// let calls = &AtomicU32::new(0);
///
/// let outcome = executor
///     .execute(
///         move || async move {
///             if calls.fetch_add(1, Ordering::SeqCst) < 2 {
///                 Err(std::io::Error::other("transient"))
///             } else {
///                 Ok("done")
///             }
///         },
///         Some(&aggregator),
///     )
///     .await;
///
/// assert_eq!(outcome.value(), Some(&"done"));
/// assert_eq!(aggregator.len(), 2);
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Create an executor for the given policy.
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// The policy this executor applies.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run an async operation with retries.
    ///
    /// Each error is captured with [`CapturedFailure::from_error`].
    ///
    /// # Panics
    ///
    /// Panics raised by `operation` are not caught. They unwind through this
    /// call and the failures recorded so far are only kept in `aggregator`.
    /// Use [`RetryExecutor::execute_blocking`] when panics must be recorded.
    pub async fn execute<F, Fut, T, E>(
        &self,
        mut operation: F,
        aggregator: Option<&FailureAggregator>,
    ) -> RetryOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error + 'static,
    {
        self.run(
            || {
                let attempt = operation();
                async move { attempt.await.map_err(|err| CapturedFailure::from_error(&err)) }
            },
            aggregator,
        )
        .await
    }

    /// Run a synchronous operation with retries.
    ///
    /// Every attempt runs on the blocking thread pool via
    /// `tokio::task::spawn_blocking`. An attempt that panics is recorded as a
    /// failure of kind [`crate::failure::PANIC_KIND`] and retried like any
    /// other failure.
    pub async fn execute_blocking<F, T, E>(
        &self,
        operation: F,
        aggregator: Option<&FailureAggregator>,
    ) -> RetryOutcome<T>
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        T: Send + 'static,
        E: Error + Send + 'static,
    {
        let operation = Arc::new(operation);
        self.run(
            || {
                let operation = Arc::clone(&operation);
                async move {
                    match tokio::task::spawn_blocking(move || operation()).await {
                        Ok(Ok(value)) => Ok(value),
                        Ok(Err(err)) => Err(CapturedFailure::from_error(&err)),
                        Err(join_err) if join_err.is_panic() => {
                            Err(CapturedFailure::from_panic(&*join_err.into_panic()))
                        }
                        Err(join_err) => Err(CapturedFailure::from_error(&join_err)),
                    }
                }
            },
            aggregator,
        )
        .await
    }

    async fn run<F, Fut, T>(
        &self,
        mut attempt_fn: F,
        aggregator: Option<&FailureAggregator>,
    ) -> RetryOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CapturedFailure>>,
    {
        let max_attempts = self.policy.max_attempts();
        let mut failures = Vec::new();
        let mut attempt: u64 = 0;

        loop {
            attempt += 1;
            match attempt_fn().await {
                Ok(value) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempt, max_attempts, "operation succeeded");
                    return RetryOutcome::Succeeded { value, failures };
                }
                Err(failure) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        kind = %failure.kind(),
                        message = %failure.message(),
                        "attempt failed"
                    );

                    if let Some(aggregator) = aggregator {
                        aggregator.append(failure.clone());
                    }
                    failures.push(failure);

                    if attempt >= max_attempts {
                        #[cfg(feature = "tracing")]
                        tracing::error!(attempts = attempt, "retries exhausted");
                        return RetryOutcome::Exhausted { failures };
                    }

                    let wait = self.policy.wait_between_retries();
                    if !wait.is_zero() {
                        tokio::time::sleep(wait).await;
                    }
                }
            }
        }
    }
}

/// Run an async operation once under `policy`.
///
/// Shorthand for `RetryExecutor::new(policy).execute(operation, aggregator)`.
pub async fn execute_with_retry<F, Fut, T, E>(
    operation: F,
    policy: RetryPolicy,
    aggregator: Option<&FailureAggregator>,
) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Error + 'static,
{
    RetryExecutor::new(policy).execute(operation, aggregator).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::PANIC_KIND;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    fn policy(max_retries: u32, wait: Duration) -> RetryPolicy {
        RetryPolicy::builder()
            .max_retries(max_retries)
            .wait_between_retries(wait)
            .build()
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_makes_n_plus_one_attempts() {
        let attempts = &AtomicU32::new(0);
        let aggregator = FailureAggregator::new();

        let outcome = execute_with_retry(
            move || async move {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(std::io::Error::other(format!("failure {n}")))
            },
            policy(3, Duration::from_secs(1)),
            Some(&aggregator),
        )
        .await;

        assert!(!outcome.is_success());
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
        assert_eq!(outcome.failures().len(), 4);
        assert_eq!(aggregator.len(), 4);

        let messages: Vec<_> = outcome.failures().iter().map(|f| f.message()).collect();
        assert_eq!(messages, ["failure 0", "failure 1", "failure 2", "failure 3"]);
        assert!(
            outcome
                .failures()
                .windows(2)
                .all(|w| w[0].timestamp() <= w[1].timestamp())
        );
        assert_eq!(aggregator.snapshot(), outcome.failures());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_third_attempt() {
        let attempts = &AtomicU32::new(0);

        let outcome = RetryExecutor::new(policy(5, Duration::from_millis(10)))
            .execute(
                move || async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(std::io::Error::other("retry me"))
                    } else {
                        Ok(42)
                    }
                },
                None,
            )
            .await;

        assert_eq!(outcome.value(), Some(&42));
        assert_eq!(outcome.failures().len(), 2);
        assert_eq!(outcome.attempts(), 3);
        // No attempt after the successful one.
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_single_attempt_without_wait() {
        let attempts = &AtomicU32::new(0);
        let start = Instant::now();

        let outcome = execute_with_retry(
            move || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(std::io::Error::other("once"))
            },
            policy(0, Duration::from_secs(30)),
            None,
        )
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.failures().len(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_only_between_attempts() {
        let start = Instant::now();

        let outcome = execute_with_retry(
            || async { Err::<(), _>(std::io::Error::other("nope")) },
            policy(2, Duration::from_secs(5)),
            None,
        )
        .await;

        assert_eq!(outcome.attempts(), 3);
        // Two waits between three attempts, none after the last.
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success_records_nothing() {
        let aggregator = FailureAggregator::new();

        let outcome = execute_with_retry(
            || async { Ok::<_, std::io::Error>("ok") },
            RetryPolicy::default(),
            Some(&aggregator),
        )
        .await;

        assert!(outcome.is_success());
        assert!(outcome.failures().is_empty());
        assert!(aggregator.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_aggregator_accumulates_across_calls() {
        let aggregator = FailureAggregator::new();
        let failing = || async { Err::<(), _>(std::io::Error::other("down")) };

        let _ = execute_with_retry(failing, policy(1, Duration::ZERO), Some(&aggregator)).await;
        let _ = execute_with_retry(failing, policy(2, Duration::ZERO), Some(&aggregator)).await;

        assert_eq!(aggregator.len(), 5);
    }

    #[tokio::test]
    async fn test_async_panic_unwinds_but_aggregator_keeps_prior_failures() {
        let aggregator = Arc::new(FailureAggregator::new());
        let attempts = Arc::new(AtomicU32::new(0));

        let task = tokio::spawn({
            let aggregator = Arc::clone(&aggregator);
            async move {
                let _ = execute_with_retry(
                    move || {
                        let attempts = Arc::clone(&attempts);
                        async move {
                            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                                Err::<(), _>(std::io::Error::other("first"))
                            } else {
                                panic!("second attempt blew up")
                            }
                        }
                    },
                    policy(3, Duration::ZERO),
                    Some(&*aggregator),
                )
                .await;
            }
        });

        let join_err = task.await.unwrap_err();
        assert!(join_err.is_panic());
        assert_eq!(aggregator.len(), 1);
        assert_eq!(aggregator.snapshot()[0].message(), "first");
    }

    #[test]
    fn test_zero_wait_runs_without_timer() {
        let outcome = tokio_test::block_on(execute_with_retry(
            || async { Err::<(), _>(std::io::Error::other("down")) },
            policy(2, Duration::ZERO),
            None,
        ));

        assert_eq!(outcome.attempts(), 3);
        tokio_test::assert_err!(outcome.into_result());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shared_aggregator_across_concurrent_calls() {
        let aggregator = FailureAggregator::new();
        let executor = RetryExecutor::new(policy(2, Duration::from_millis(100)));

        let first = executor.execute(
            || async { Err::<(), _>(std::io::Error::other("first")) },
            Some(&aggregator),
        );
        let second = executor.execute(
            || async { Err::<(), _>(std::io::Error::other("second")) },
            Some(&aggregator),
        );
        let (a, b) = tokio::join!(first, second);

        assert_eq!(a.failures().len(), 3);
        assert_eq!(b.failures().len(), 3);
        assert_eq!(aggregator.len(), 6);
        assert_eq!(aggregator.flatten_messages().matches("first").count(), 3);
    }

    #[tokio::test]
    async fn test_blocking_operation_retries() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);

        let outcome = RetryExecutor::new(policy(3, Duration::ZERO))
            .execute_blocking(
                move || {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(std::io::Error::other("cold start"))
                    } else {
                        Ok(std::thread::current().name().map(str::to_owned))
                    }
                },
                None,
            )
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.failures().len(), 1);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_blocking_panic_is_captured() {
        let aggregator = FailureAggregator::new();

        let outcome = RetryExecutor::new(policy(1, Duration::ZERO))
            .execute_blocking(
                || -> Result<(), std::io::Error> { panic!("exploded") },
                Some(&aggregator),
            )
            .await;

        assert!(!outcome.is_success());
        assert_eq!(aggregator.len(), 2);
        assert_eq!(aggregator.filter_by_kind(PANIC_KIND).len(), 2);
        assert_eq!(outcome.failures()[0].message(), "exploded");
    }
}
