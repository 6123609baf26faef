//! In-memory test doubles for the consumed interfaces.

mod channel;
mod metrics;

pub use channel::ScriptedChannel;
pub use metrics::ScriptedMetrics;
