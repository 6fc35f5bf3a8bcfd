use std::time::Duration;

/// Bounded retry with linear backoff: the wait after failed attempt `n`
/// (0-based) is `n * step`, so the first retry follows immediately.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_step: Duration) -> Self {
        RetryPolicy { max_attempts, backoff_step }
    }

    /// Wait before the next attempt, `None` once the ceiling is reached.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt + 1 >= self.max_attempts {
            return None;
        }
        Some(self.backoff_step * attempt)
    }
}

/// Retry bookkeeping for one slot refresh.
#[derive(Debug, Default)]
pub struct RetryState {
    pub attempts: u32,
    pub delays: Vec<Duration>,
}

impl RetryState {
    pub fn total_wait(&self) -> Duration {
        self.delays.iter().sum()
    }
}
