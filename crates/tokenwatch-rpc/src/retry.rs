//! Exponential backoff for transient transport failures.
//!
//! Retries here only smooth over a flaky connection inside one request. A
//! request that still fails is reported to the poll loop, which backs off for
//! a full poll interval and rescans from its cursor.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    /// Cap on a single delay.
    pub max_backoff: Duration,
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Computes the delay before each retry. Stateless.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Delay before the `attempt`-th retry (1-based), or `None` once retries
    /// are exhausted.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.config.max_retries {
            return None;
        }
        let exp = self.config.multiplier.powi(attempt as i32 - 1);
        let ms = self.config.initial_backoff.as_millis() as f64 * exp;
        let capped = ms.min(self.config.max_backoff.as_millis() as f64);
        Some(Duration::from_millis(capped as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_retries: u32, max_backoff_ms: u64) -> RetryPolicy {
        RetryPolicy::new(RetryConfig {
            max_retries,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(max_backoff_ms),
            multiplier: 2.0,
        })
    }

    #[test]
    fn doubles_each_attempt() {
        let p = policy(3, 10_000);
        assert_eq!(p.next_delay(1), Some(Duration::from_millis(100)));
        assert_eq!(p.next_delay(2), Some(Duration::from_millis(200)));
        assert_eq!(p.next_delay(3), Some(Duration::from_millis(400)));
        assert_eq!(p.next_delay(4), None);
    }

    #[test]
    fn capped_at_max_backoff() {
        let p = policy(10, 500);
        assert_eq!(p.next_delay(8), Some(Duration::from_millis(500)));
    }

    #[test]
    fn none_never_retries() {
        let p = RetryPolicy::new(RetryConfig::none());
        assert_eq!(p.next_delay(1), None);
    }
}
