//! Bounded retry with exponential backoff and jitter for provider calls.
//!
//! Rate-limit responses carrying a Retry-After hint wait exactly that long;
//! everything else backs off exponentially with jitter so outages don't turn
//! into tight retry loops.

use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fuelroute_core::ProviderError;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter_ratio: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            jitter_ratio: 0.2,
        }
    }
}

fn is_retryable(err: &ProviderError) -> bool {
    match err {
        ProviderError::RateLimited { .. } => true,
        ProviderError::Service { retryable, .. } => *retryable,
        ProviderError::NotFound { .. } => false,
    }
}

/// Run `op` until it succeeds, fails terminally, or the attempt budget runs
/// out. The last error is returned unchanged.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut delay = policy.base_delay.max(Duration::from_millis(1));
    let mut attempt = 0;
    loop {
        attempt += 1;
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if attempt >= policy.max_attempts || !is_retryable(&err) {
            return Err(err);
        }
        let wait = match &err {
            ProviderError::RateLimited {
                retry_after: Some(hint),
            } => *hint,
            _ => add_jitter(delay, policy.jitter_ratio),
        };
        tracing::warn!(attempt, wait_ms = wait.as_millis() as u64, error = %err, "provider call failed, retrying");
        tokio::time::sleep(wait).await;
        delay = delay.saturating_mul(2).min(policy.max_delay);
    }
}

fn add_jitter(delay: Duration, ratio: f64) -> Duration {
    if !(0.0..=1.0).contains(&ratio) {
        return delay;
    }

    let delay_ms = delay.as_millis();
    if delay_ms == 0 {
        return delay;
    }

    let jitter_ms_max = ((delay_ms as f64) * ratio) as u128;
    if jitter_ms_max == 0 {
        return delay;
    }

    let now_nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);
    let jitter_ms = (now_nanos as u128) % (jitter_ms_max + 1);
    delay + Duration::from_millis(jitter_ms as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            jitter_ratio: 0.0,
        }
    }

    #[tokio::test]
    async fn returns_first_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&quick_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ProviderError>(42) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_failures_until_budget_runs_out() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&quick_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ProviderError::Service {
                    message: "HTTP 503".to_string(),
                    retryable: true,
                })
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_terminal_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&quick_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ProviderError::NotFound {
                    query: "nowhere".to_string(),
                })
            }
        })
        .await;
        assert!(matches!(result, Err(ProviderError::NotFound { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn eventual_success_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&quick_policy(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ProviderError::Service {
                        message: "HTTP 502".to_string(),
                        retryable: true,
                    })
                } else {
                    Ok("route")
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "route");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn honors_retry_after_hint() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();
        let result = with_retry(&quick_policy(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(ProviderError::RateLimited {
                        retry_after: Some(Duration::from_millis(20)),
                    })
                } else {
                    Ok(())
                }
            }
        })
        .await;
        assert!(result.is_ok());
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
