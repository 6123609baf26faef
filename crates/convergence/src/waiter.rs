//! The bounded-retry convergence waiter.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::{Pause, RetryBudget, Sleeper};

/// What a condition evaluation observed on one poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// The externally observed state matches the expected post-action state.
    Converged,
    /// Not there yet; sleep and poll again.
    Pending,
    /// The observing endpoint itself does not exist yet. Retried exactly
    /// like `Pending`; a permanently missing endpoint surfaces as a
    /// timeout rather than an error.
    NotFound,
}

/// How a wait ended, short of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The condition became true on the `attempts`-th evaluation.
    Converged { attempts: u32 },
    /// The sleep between attempts was interrupted. Not an error: the caller
    /// asked to stop waiting, and the external state is now indeterminate.
    Interrupted,
}

/// Failure of a convergence wait.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The condition never became true within the budget.
    #[error("timed out waiting for {what} after {attempts} attempts in {elapsed:?}")]
    Timeout {
        what: String,
        attempts: u32,
        elapsed: Duration,
    },
    /// The condition evaluator failed for a reason other than
    /// "not found yet". The wait aborts on the first such failure.
    #[error("gave up waiting for {what}: {error:#}")]
    Condition { what: String, error: anyhow::Error },
}

/// Repeatedly evaluate `condition` until it converges, the budget runs out,
/// or the sleep between attempts is interrupted.
///
/// The condition is evaluated before the first sleep, so a condition that
/// is already true never sleeps at all: with a budget of 5 attempts and a
/// condition that becomes true on the 3rd evaluation, exactly two pauses
/// happen. An `Err` from the evaluator aborts the wait immediately;
/// [`Probe::NotFound`] does not.
pub async fn wait_until<F, Fut>(
    what: &str,
    mut condition: F,
    interval: Duration,
    budget: RetryBudget,
    sleeper: &dyn Sleeper,
) -> Result<Outcome, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<Probe>>,
{
    let started = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match condition().await {
            Ok(Probe::Converged) => {
                debug!("{what}: converged after {attempts} attempts");
                return Ok(Outcome::Converged { attempts });
            }
            Ok(Probe::Pending) => {}
            Ok(Probe::NotFound) => {
                debug!("{what}: observing endpoint not registered yet");
            }
            Err(error) => {
                return Err(WaitError::Condition {
                    what: what.to_string(),
                    error,
                });
            }
        }

        if budget.exhausted(attempts, started) {
            return Err(WaitError::Timeout {
                what: what.to_string(),
                attempts,
                elapsed: started.elapsed(),
            });
        }

        if sleeper.pause(interval).await == Pause::Interrupted {
            warn!("{what}: interrupted while waiting");
            return Ok(Outcome::Interrupted);
        }
    }
}
