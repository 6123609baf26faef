//! Retry budgets for bounded polling.

use std::time::Duration;

use tokio::time::Instant;

/// Bound on how long a convergence wait may keep polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryBudget {
    /// Give up after this many condition evaluations.
    Attempts(u32),
    /// Give up once this much time has passed since the wait began.
    Elapsed(Duration),
}

impl RetryBudget {
    /// Whether the budget is spent after `attempts` evaluations of a wait
    /// that began at `started`. Measured on the tokio clock so waits stay
    /// deterministic under a paused test runtime.
    pub fn exhausted(&self, attempts: u32, started: Instant) -> bool {
        match self {
            RetryBudget::Attempts(max) => attempts >= *max,
            RetryBudget::Elapsed(max) => started.elapsed() >= *max,
        }
    }
}
