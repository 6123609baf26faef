//! Test doubles for the sleep primitive.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::{Pause, Sleeper};

/// Sleeper that returns instantly and records every completed pause, so
/// tests can assert on sleep counts and durations without wall-clock time.
///
/// `interrupt_after(n)` makes every pause after the first `n` report
/// [`Pause::Interrupted`]; interrupted pauses are not recorded.
#[derive(Debug, Default)]
pub struct ManualSleeper {
    pauses: Mutex<Vec<Duration>>,
    interrupt_after: Option<usize>,
}

impl ManualSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupt_after(mut self, pauses: usize) -> Self {
        self.interrupt_after = Some(pauses);
        self
    }

    /// The completed pauses, in order.
    pub fn recorded(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for ManualSleeper {
    async fn pause(&self, duration: Duration) -> Pause {
        let mut pauses = self.pauses.lock().unwrap();
        if let Some(limit) = self.interrupt_after {
            if pauses.len() >= limit {
                return Pause::Interrupted;
            }
        }
        pauses.push(duration);
        Pause::Elapsed
    }
}
