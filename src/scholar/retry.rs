//! Bounded retry policy for rate-limited search requests.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Boxed future type for sleeper operations.
pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Clock abstraction used between retries.
pub trait Sleeper: Send + Sync {
    /// Suspend the caller for `duration`.
    fn sleep(&self, duration: Duration) -> SleepFuture<'_>;
}

/// Sleeper backed by the tokio timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Exponential backoff without jitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total number of requests allowed, first one included.
    pub max_attempts: u32,
    /// Delay before the second attempt, in seconds.
    pub base_delay_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 1,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after a rate-limited `attempt` (counted from 0).
    ///
    /// `base * 2^attempt`, saturating on overflow.
    #[must_use]
    pub const fn backoff(&self, attempt: u32) -> Duration {
        let factor = match 1_u64.checked_shl(attempt) {
            Some(factor) => factor,
            None => u64::MAX,
        };
        Duration::from_secs(self.base_delay_secs.saturating_mul(factor))
    }

    /// Whether another request may follow a failed `attempt`.
    #[must_use]
    pub const fn has_next(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let policy = RetryPolicy::default();
        let delays: Vec<u64> = (0..5).map(|a| policy.backoff(a).as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 16]);
    }

    #[test]
    fn test_has_next() {
        let policy = RetryPolicy::default();
        assert!(policy.has_next(0));
        assert!(policy.has_next(3));
        assert!(!policy.has_next(4));
    }

    #[test]
    fn test_backoff_saturates() {
        let policy = RetryPolicy {
            max_attempts: 100,
            base_delay_secs: 3,
        };
        assert_eq!(policy.backoff(80), Duration::from_secs(u64::MAX));
    }
}
