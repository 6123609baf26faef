//! Fixed-delay waiting for changes with no completion signal.

use std::time::Duration;

use tracing::debug;

use crate::{Pause, Sleeper};

/// A single unconditional pause used after control changes whose
/// propagation cannot be observed.
///
/// The delay is a pessimistic empirical bound on the external system's
/// replication latency; there is nothing to poll, so correctness is bought
/// with latency.
#[derive(Debug, Clone, Copy)]
pub struct PropagationDelay {
    delay: Duration,
}

impl PropagationDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Block for the full delay. An interrupted pause means the change may
    /// or may not have propagated; the caller must treat the state as
    /// indeterminate.
    pub async fn wait(&self, sleeper: &dyn Sleeper) -> Pause {
        debug!("pausing {:?} for propagation", self.delay);
        sleeper.pause(self.delay).await
    }
}
