//! Retry utilities shared by the resolver and the downloader
//!
//! Both call sites run the same loop: a bounded number of attempts with a
//! randomized pause from the retry range before every attempt after the
//! first. Keeping it in one place stops the two from drifting apart.

use std::future::Future;
use tracing::{debug, warn};

use crate::errors::AppResult;
use crate::utils::jitter::{DelayKind, DelayPolicy};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    delays: DelayPolicy,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delays: DelayPolicy) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delays,
        }
    }

    /// Execute an operation with retry logic
    ///
    /// The closure receives the 1-based attempt number. Errors that are not
    /// retryable end the loop immediately; otherwise the last error is
    /// returned once attempts are exhausted.
    pub async fn run<T, F, Fut>(&self, operation_name: &str, mut operation: F) -> AppResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut attempt = 1;
        loop {
            if attempt > 1 {
                self.delays.wait(DelayKind::Retry).await;
                debug!(
                    "Retrying {} (attempt {}/{})",
                    operation_name, attempt, self.max_attempts
                );
            }

            match operation(attempt).await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(
                            "{} succeeded on attempt {}/{}",
                            operation_name, attempt, self.max_attempts
                        );
                    }
                    return Ok(result);
                }
                Err(err) => {
                    warn!(
                        "Attempt {}/{} - {} failed: {}",
                        attempt, self.max_attempts, operation_name, err
                    );

                    if !err.is_retryable() {
                        debug!("{} failed with non-retryable error", operation_name);
                        return Err(err);
                    }
                    if attempt >= self.max_attempts {
                        warn!(
                            "{} failed after {} attempts",
                            operation_name, self.max_attempts
                        );
                        return Err(err);
                    }
                }
            }
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, DelayPolicy::disabled())
    }

    #[tokio::test]
    async fn test_stops_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: AppResult<()> = policy(3)
            .run("always fails", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::network("https://x.com", "connection reset")) }
            })
            .await;

        assert!(matches!(result, Err(AppError::Network { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_returns_first_success() {
        let calls = AtomicU32::new(0);
        let result = policy(5)
            .run("flaky", |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(AppError::network("https://x.com", "HTTP 503"))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_short_circuits() {
        let calls = AtomicU32::new(0);
        let result: AppResult<()> = policy(3)
            .run("bad url", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::malformed_url("http://[")) }
            })
            .await;

        assert!(matches!(result, Err(AppError::MalformedUrl { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        assert_eq!(policy(0).max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_retry_range_between_attempts() {
        let mut delays = crate::config::DelayConfig::none();
        delays.retry = crate::utils::jitter::DelayRange::new(10, 11);
        delays.error = crate::utils::jitter::DelayRange::new(500, 501);
        let policy = RetryPolicy::new(3, DelayPolicy::new(delays));

        let start = tokio::time::Instant::now();
        let result: AppResult<()> = policy
            .run("always fails", |_| async {
                Err(AppError::network("https://x.com", "connection reset"))
            })
            .await;

        assert!(result.is_err());
        let elapsed = start.elapsed();
        assert!(
            elapsed >= std::time::Duration::from_millis(20)
                && elapsed < std::time::Duration::from_millis(25),
            "expected two 10ms retry pauses, got {elapsed:?}"
        );
    }
}
