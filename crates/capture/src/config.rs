//! Timing knobs for the capture controller.

use std::time::Duration;

/// Poll intervals, retry budgets, and the propagation delay.
///
/// The defaults reproduce the empirically tuned values the asncdc
/// container needs: a 1s status poll with 30 attempts for service start,
/// 60 attempts for snapshot completion, and a pessimistic 15s pause for
/// registration changes that offer no completion signal. Tests shrink all
/// of these.
#[derive(Debug, Clone, Copy)]
pub struct CaptureTimings {
    /// Interval between status/metric polls.
    pub poll_interval: Duration,
    /// Status poll attempts before the start wait gives up.
    pub start_attempts: u32,
    /// Metric poll attempts before the snapshot wait gives up.
    pub snapshot_attempts: u32,
    /// Unconditional pause after registration changes.
    pub propagation_delay: Duration,
}

impl Default for CaptureTimings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            start_attempts: 30,
            snapshot_attempts: 60,
            propagation_delay: Duration::from_secs(15),
        }
    }
}
