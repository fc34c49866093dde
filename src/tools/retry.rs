//! Bounded retry for remote service calls
//!
//! Only errors classified retryable by `AgentError::is_retryable` are
//! repeated. Backoff doubles per attempt up to a cap, with ±25% jitter.
//! When attempts run out the last error is returned unchanged.

use crate::errors::Result;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Upper bound on a single backoff pause
const MAX_BACKOFF: Duration = Duration::from_secs(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    base: Duration,
    jitter: bool,
}

impl RetryPolicy {
    /// `attempts` counts the first call and is at least one
    pub fn new(attempts: u32, base: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base,
            jitter: true,
        }
    }

    /// Single attempt, never sleeps
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Pause before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        let pause = self.base.saturating_mul(factor).min(MAX_BACKOFF);
        if !self.jitter || pause.is_zero() {
            return pause;
        }
        pause.mul_f64(rand::thread_rng().gen_range(0.75..=1.25))
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if attempt >= self.attempts || !err.is_retryable() {
                return Err(err);
            }

            let pause = self.backoff(attempt);
            warn!(
                attempt,
                attempts = self.attempts,
                pause_ms = pause.as_millis() as u64,
                error = %err,
                "Remote call failed, retrying"
            );
            sleep(pause).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AgentError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counting<'a>(
        calls: &'a AtomicU32,
        succeed_on: u32,
        failure: fn() -> AgentError,
    ) -> impl FnMut() -> std::future::Ready<Result<u32>> + 'a {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(if n >= succeed_on { Ok(n) } else { Err(failure()) })
        }
    }

    fn embedding_down() -> AgentError {
        AgentError::EmbeddingServiceError("503".to_string())
    }

    fn bad_config() -> AgentError {
        AgentError::ConfigError("PORT".to_string())
    }

    #[tokio::test]
    async fn test_recovers_from_transient_failures() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(4, Duration::from_millis(1));
        let value = policy.run(counting(&calls, 3, embedding_down)).await.unwrap();
        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_with_last_error() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(2, Duration::from_millis(1));
        let err = policy.run(counting(&calls, 99, embedding_down)).await.unwrap_err();
        assert!(matches!(err, AgentError::EmbeddingServiceError(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(5, Duration::from_millis(1));
        assert!(policy.run(counting(&calls, 99, bad_config)).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(10, Duration::from_millis(500)).without_jitter();
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(2), Duration::from_millis(1000));
        assert_eq!(policy.backoff(4), Duration::from_millis(4000));
        assert_eq!(policy.backoff(30), MAX_BACKOFF);
    }

    #[test]
    fn test_jitter_stays_within_a_quarter() {
        let policy = RetryPolicy::new(3, Duration::from_millis(400));
        for _ in 0..50 {
            let pause = policy.backoff(1);
            assert!(pause >= Duration::from_millis(300) && pause <= Duration::from_millis(500));
        }
    }

    #[test]
    fn test_at_least_one_attempt() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).attempts(), 1);
        assert_eq!(RetryPolicy::none().attempts(), 1);
    }
}
