//! Bounded retries for physical effects

use std::time::Duration;
use tiersort_domain::PortError;

/// Fixed-count, fixed-delay retry policy
///
/// Only failures whose [`FailureKind`](tiersort_domain::FailureKind) is retryable get
/// another attempt; permission and unexpected errors are returned right away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Create a policy; `attempts` is clamped to at least one
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Total number of attempts
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Run `op` until it succeeds, fails permanently, or the attempts are used up
    ///
    /// `what` describes the operation for log lines ("move 'a' to 'b'").
    pub fn run<T, E, F>(&self, what: &str, mut op: F) -> Result<T, E>
    where
        E: PortError,
        F: FnMut() -> Result<T, E>,
    {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if !e.kind().is_retryable() || attempt >= self.attempts => return Err(e),
                Err(e) => {
                    tracing::warn!("Attempt {} failed to {}: {}", attempt, what, e);
                    if !self.delay.is_zero() {
                        std::thread::sleep(self.delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}
