//! Bounded retry with escalating timeouts
//!
//! Each attempt runs under the policy's timeout for that attempt number. A
//! retriable failure waits `attempt * backoff_unit` before the next attempt;
//! anything else, or running out of budget, returns the last error.

use log::warn;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::core::{ParticipantError, RetryPolicy};

pub async fn with_retry<F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut attempt_fn: F,
) -> Result<String, ParticipantError>
where
    F: FnMut(u32, Duration) -> Fut,
    Fut: Future<Output = Result<String, ParticipantError>>,
{
    let budget = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let limit = policy.timeout_for(attempt);
        let outcome = match timeout(limit, attempt_fn(attempt, limit)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ParticipantError::Timeout),
        };

        match outcome {
            Ok(text) => return Ok(text),
            Err(e) if e.is_retriable() && attempt < budget => {
                let wait = policy.backoff_after(attempt);
                warn!(
                    "{label} attempt {attempt}/{budget} failed ({e}), retrying in {wait:?}"
                );
                if !wait.is_zero() {
                    sleep(wait).await;
                }
                attempt += 1;
            }
            Err(e) => {
                if e.is_retriable() {
                    warn!("{label} giving up after {attempt} attempt(s): {e}");
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            attempt_timeouts: vec![
                Duration::from_secs(15),
                Duration::from_secs(30),
                Duration::from_secs(45),
            ],
            backoff_unit: Duration::from_secs(2),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_timing_out_hits_ceiling() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let start = Instant::now();

        let seen = calls.clone();
        let result = with_retry(&policy(), "test", move |attempt, limit| {
            seen.lock().unwrap().push((attempt, limit));
            futures::future::pending::<Result<String, ParticipantError>>()
        })
        .await;

        assert_eq!(result, Err(ParticipantError::Timeout));
        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                (1, Duration::from_secs(15)),
                (2, Duration::from_secs(30)),
                (3, Duration::from_secs(45)),
            ]
        );
        // 15 + 2 + 30 + 4 + 45
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(96), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(97), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_backs_off_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let counter = calls.clone();
        let result = with_retry(&policy(), "test", move |attempt, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err(ParticipantError::RateLimited)
                } else {
                    Ok("finally".to_string())
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "finally");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(6), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(7), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_error_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let counter = calls.clone();
        let result = with_retry(&policy(), "test", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(ParticipantError::EmptyResponse) }
        })
        .await;

        assert_eq!(result, Err(ParticipantError::EmptyResponse));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_error_kind_is_returned() {
        let result = with_retry(&policy(), "test", |attempt, _| async move {
            if attempt == 3 {
                Err(ParticipantError::RateLimited)
            } else {
                Err(ParticipantError::Timeout)
            }
        })
        .await;

        assert_eq!(result, Err(ParticipantError::RateLimited));
    }

    #[tokio::test]
    async fn test_single_attempt_budget() {
        let mut single = policy();
        single.max_attempts = 1;
        let calls = AtomicU32::new(0);

        let result = with_retry(&single, "test", |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ParticipantError::RateLimited) }
        })
        .await;

        assert_eq!(result, Err(ParticipantError::RateLimited));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
