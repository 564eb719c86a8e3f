//! Retry budget for convergence loops against the identity service.

use std::time::Duration;

/// Bounded retry budget with a constant inter-attempt delay.
///
/// Used to wait out the identity service's read-after-write window. The
/// delay does not grow between attempts; total wait is bounded by
/// `max_attempts * delay`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryBudget {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryBudget {
    /// Create a budget. `max_attempts` is clamped to at least one attempt.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A single attempt, no waiting.
    pub fn single_attempt() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Upper bound on time spent sleeping when every attempt fails.
    pub fn max_total_delay(&self) -> Duration {
        self.delay * self.max_attempts
    }
}
