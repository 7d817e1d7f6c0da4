//! Retry policy with exponential backoff for Graph requests

use rand::Rng;
use std::time::Duration;

/// Retry behaviour for transient HTTP failures
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Add up to 25% random jitter to each delay
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no waiting
    #[cfg(test)]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }
}

/// Computes delays between attempts
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts.max(1)
    }

    /// Whether another attempt is allowed after `attempt` (1-based) failed
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts()
    }

    /// Delay before the attempt following `attempt` (1-based).
    ///
    /// A server-provided `Retry-After` wins over the computed backoff but is
    /// still capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(retry_after) = retry_after {
            return retry_after.min(self.config.max_delay);
        }

        let exponent = attempt.saturating_sub(1) as i32;
        let base_ms = self.config.base_delay.as_millis() as f64
            * self.config.backoff_multiplier.powi(exponent);
        let capped_ms = base_ms.min(self.config.max_delay.as_millis() as f64);

        let jitter_ms = if self.config.jitter && capped_ms >= 4.0 {
            rand::rng().random_range(0.0..capped_ms * 0.25)
        } else {
            0.0
        };

        Duration::from_millis((capped_ms + jitter_ms) as u64).min(self.config.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_jitter() -> RetryConfig {
        RetryConfig {
            jitter: false,
            ..RetryConfig::default()
        }
    }

    #[test]
    fn test_exponential_backoff() {
        let policy = RetryPolicy::new(no_jitter());

        assert_eq!(policy.delay_for(1, None), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2, None), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(3, None), Duration::from_millis(2000));
    }

    #[test]
    fn test_backoff_capped_at_max_delay() {
        let policy = RetryPolicy::new(no_jitter());
        assert_eq!(policy.delay_for(20, None), Duration::from_secs(30));
    }

    #[test]
    fn test_retry_after_wins() {
        let policy = RetryPolicy::new(no_jitter());
        assert_eq!(
            policy.delay_for(1, Some(Duration::from_secs(7))),
            Duration::from_secs(7)
        );
        assert_eq!(
            policy.delay_for(1, Some(Duration::from_secs(600))),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let policy = RetryPolicy::new(RetryConfig::default());
        for _ in 0..50 {
            let delay = policy.delay_for(1, None);
            assert!(delay >= Duration::from_millis(500));
            assert!(delay < Duration::from_millis(625));
        }
    }

    #[test]
    fn test_should_retry() {
        let policy = RetryPolicy::new(RetryConfig::default());
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));

        let single = RetryPolicy::new(RetryConfig::none());
        assert!(!single.should_retry(1));
    }

    #[test]
    fn test_zero_attempts_treated_as_one() {
        let policy = RetryPolicy::new(RetryConfig {
            max_attempts: 0,
            ..RetryConfig::none()
        });
        assert_eq!(policy.max_attempts(), 1);
    }
}
