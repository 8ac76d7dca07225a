//! Bounded retry with quadratic backoff.
//!
//! One logical API operation runs through [`RetryController::run`]. A failed
//! attempt is retried only when [`ProviderError::is_retryable`] says so; the
//! wait before retry `n` is `base_delay * n²` (1s, 4s, 9s with defaults),
//! capped at `max_delay`. Both the in-flight attempt and the backoff sleep are
//! raced against a [`CancellationToken`].

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{ProviderError, Result};
use crate::types::ProviderOptions;

/// Retry limits and backoff shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `0` disables retrying.
    pub max_retries: u32,
    /// Backoff unit.
    pub base_delay: Duration,
    /// Upper bound for one backoff sleep.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn from_options(options: &ProviderOptions) -> Self {
        Self {
            max_retries: options.max_retries,
            base_delay: Duration::from_millis(options.base_delay_ms),
            max_delay: Duration::from_millis(options.max_delay_ms),
        }
    }

    /// Delay before retry `retry` (1-based): `base_delay * retry²`, capped.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let factor = retry.saturating_mul(retry);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(Duration::MAX)
            .min(self.max_delay)
    }
}

/// State of a retry about to happen, used for logging.
#[derive(Debug, Clone)]
pub struct RetryAttempt {
    /// 1-based retry number.
    pub attempt_number: u32,
    /// Error of the attempt that just failed.
    pub last_error: ProviderError,
    /// Sleep before the retry starts.
    pub next_delay: Duration,
}

impl fmt::Display for RetryAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "retry {} in {:.1}s after: {}",
            self.attempt_number,
            self.next_delay.as_secs_f32(),
            self.last_error
        )
    }
}

/// Runs operations under a [`RetryPolicy`] for one provider.
#[derive(Debug, Clone)]
pub struct RetryController {
    provider: String,
    policy: RetryPolicy,
    cancel: CancellationToken,
}

impl RetryController {
    pub fn new(provider: impl Into<String>, policy: RetryPolicy, cancel: CancellationToken) -> Self {
        Self {
            provider: provider.into(),
            policy,
            cancel,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run `attempt` until it succeeds, fails terminally, or retries run out.
    ///
    /// `attempt` receives the 0-based attempt index and must build a fresh
    /// request each time. Terminal errors are returned unchanged; a retryable
    /// error on the last attempt is wrapped in
    /// [`ProviderError::RetriesExhausted`].
    pub async fn run<T, F, Fut>(&self, operation: &str, mut attempt: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retries = 0_u32;
        loop {
            if self.cancel.is_cancelled() {
                return Err(self.cancelled(operation));
            }

            let outcome = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(self.cancelled(operation)),
                r = attempt(retries) => r,
            };

            let error = match outcome {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => e,
            };

            if retries >= self.policy.max_retries {
                log::error!(
                    "[{}] {operation} failed after {retries} retries: {error}",
                    self.provider
                );
                return Err(ProviderError::RetriesExhausted {
                    provider: self.provider.clone(),
                    retries,
                    last: Box::new(error),
                });
            }

            retries += 1;
            let next = RetryAttempt {
                attempt_number: retries,
                next_delay: self.policy.backoff_delay(retries),
                last_error: error,
            };
            log::warn!(
                "[{}] {operation} {next} ({retries}/{})",
                self.provider,
                self.policy.max_retries
            );

            tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(self.cancelled(operation)),
                () = tokio::time::sleep(next.next_delay) => {}
            }
        }
    }

    fn cancelled(&self, operation: &str) -> ProviderError {
        log::debug!("[{}] {operation} cancelled", self.provider);
        ProviderError::Cancelled {
            provider: self.provider.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn upstream(code: &str) -> ProviderError {
        ProviderError::UpstreamApi {
            provider: "test".into(),
            code: code.into(),
            message: "boom".into(),
            request_id: None,
        }
    }

    fn controller(max_retries: u32) -> RetryController {
        RetryController::new(
            "test",
            RetryPolicy {
                max_retries,
                ..RetryPolicy::default()
            },
            CancellationToken::new(),
        )
    }

    // ---- backoff_delay ----

    #[test]
    fn backoff_is_quadratic() {
        let p = RetryPolicy::default();
        assert_eq!(p.backoff_delay(1), Duration::from_secs(1));
        assert_eq!(p.backoff_delay(2), Duration::from_secs(4));
        assert_eq!(p.backoff_delay(3), Duration::from_secs(9));
    }

    #[test]
    fn backoff_is_capped() {
        let p = RetryPolicy {
            max_delay: Duration::from_secs(5),
            ..RetryPolicy::default()
        };
        assert_eq!(p.backoff_delay(2), Duration::from_secs(4));
        assert_eq!(p.backoff_delay(3), Duration::from_secs(5));
        assert_eq!(p.backoff_delay(u32::MAX), Duration::from_secs(5));
    }

    #[test]
    fn policy_from_options() {
        let opts = ProviderOptions {
            max_retries: 5,
            base_delay_ms: 10,
            max_delay_ms: 200,
            ..ProviderOptions::default()
        };
        let p = RetryPolicy::from_options(&opts);
        assert_eq!(p.max_retries, 5);
        assert_eq!(p.backoff_delay(3), Duration::from_millis(90));
        assert_eq!(p.backoff_delay(10), Duration::from_millis(200));
    }

    // ---- 调用次数 ----

    #[tokio::test(start_paused = true)]
    async fn retryable_codes_use_every_attempt() {
        for code in crate::error::RETRYABLE_API_CODES {
            let mut calls = 0;
            let result: Result<()> = controller(3)
                .run("CreateRecord", |_| {
                    calls += 1;
                    let e = upstream(code);
                    async move { Err(e) }
                })
                .await;
            assert_eq!(calls, 4, "{code}");
            match result {
                Err(ProviderError::RetriesExhausted { retries, last, .. }) => {
                    assert_eq!(retries, 3);
                    assert_eq!(last.upstream_code(), Some(*code));
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_code_single_attempt() {
        let mut calls = 0;
        let result: Result<()> = controller(3)
            .run("CreateRecord", |_| {
                calls += 1;
                async { Err(upstream("AuthFailure.SignatureFailure")) }
            })
            .await;
        assert_eq!(calls, 1);
        assert!(matches!(result, Err(ProviderError::UpstreamApi { ref code, .. }) if code == "AuthFailure.SignatureFailure"));
    }

    #[tokio::test(start_paused = true)]
    async fn local_errors_not_retried() {
        let mut calls = 0;
        let result: Result<()> = controller(3)
            .run("CreateRecord", |_| {
                calls += 1;
                async { Err(ProviderError::marshalling("TTL", "negative")) }
            })
            .await;
        assert_eq!(calls, 1);
        assert!(matches!(result, Err(ProviderError::Marshalling { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn transport_errors_retried() {
        let mut calls = 0;
        let result = controller(2)
            .run("DescribeDomainList", |n| {
                calls += 1;
                async move {
                    if n < 2 {
                        Err(ProviderError::Timeout {
                            provider: "test".into(),
                            detail: "30s".into(),
                        })
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;
        assert_eq!(calls, 3);
        assert_eq!(result.unwrap(), "done");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_wraps_first_failure() {
        let mut calls = 0;
        let result: Result<()> = controller(0)
            .run("CreateRecord", |_| {
                calls += 1;
                async { Err(upstream("InternalError")) }
            })
            .await;
        assert_eq!(calls, 1);
        assert!(matches!(
            result,
            Err(ProviderError::RetriesExhausted { retries: 0, .. })
        ));
    }

    // ---- 退避时间 ----

    #[tokio::test(start_paused = true)]
    async fn delays_follow_square_schedule() {
        let mut stamps = Vec::new();
        let _: Result<()> = controller(3)
            .run("CreateRecord", |_| {
                stamps.push(Instant::now());
                async { Err(upstream("RequestLimitExceeded")) }
            })
            .await;
        let gaps: Vec<Duration> = stamps.windows(2).map(|w| w[1] - w[0]).collect();
        assert_eq!(
            gaps,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(4),
                Duration::from_secs(9)
            ]
        );
    }

    // ---- 取消 ----

    #[tokio::test(start_paused = true)]
    async fn cancel_during_backoff() {
        let token = CancellationToken::new();
        let ctl = RetryController::new("test", RetryPolicy::default(), token.clone());
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            token.cancel();
        });

        let start = Instant::now();
        let mut calls = 0;
        let result: Result<()> = ctl
            .run("CreateRecord", |_| {
                calls += 1;
                async { Err(upstream("InternalError")) }
            })
            .await;
        canceller.await.unwrap();

        // attempt at t=0, retry at t=1s, cancelled at t=2s while waiting 4s
        assert_eq!(calls, 2);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
        assert!(matches!(result, Err(ProviderError::Cancelled { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_in_flight_attempt() {
        let token = CancellationToken::new();
        let ctl = RetryController::new("test", RetryPolicy::default(), token.clone());
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            token.cancel();
        });

        let result: Result<()> = ctl
            .run("CreateRecord", |_| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .await;
        canceller.await.unwrap();
        assert!(matches!(result, Err(ProviderError::Cancelled { .. })));
    }

    #[tokio::test]
    async fn already_cancelled_makes_no_attempt() {
        let token = CancellationToken::new();
        token.cancel();
        let ctl = RetryController::new("test", RetryPolicy::default(), token);
        let mut calls = 0;
        let result: Result<()> = ctl
            .run("CreateRecord", |_| {
                calls += 1;
                async { Ok(()) }
            })
            .await;
        assert_eq!(calls, 0);
        assert!(matches!(result, Err(ProviderError::Cancelled { .. })));
    }

    #[test]
    fn retry_attempt_display() {
        let a = RetryAttempt {
            attempt_number: 2,
            last_error: upstream("InternalError"),
            next_delay: Duration::from_secs(4),
        };
        assert_eq!(
            a.to_string(),
            "retry 2 in 4.0s after: [test] API error [InternalError]: boom"
        );
    }
}
