//! db2-cdc-harness Library
//!
//! A harness for driving Db2's ASN change-data-capture subsystem into
//! known, verified states for deterministic integration testing.
//!
//! The ASN capture service runs out of process: starting it, registering
//! tables, and propagating captured changes all happen on timelines the
//! caller does not control. The harness issues each control command and
//! then waits - by bounded status/metric polling where the external system
//! offers a signal, by a fixed pessimistic delay where it does not - so a
//! test scenario never proceeds on a command that has not taken effect.
//!
//! # Workspace crates
//!
//! - `convergence` - interruptible sleeps, retry budgets, the bounded poll
//!   loop, and the fixed-delay propagation waiter
//! - `db2-cdc-harness-capture` - the capture service controller, table
//!   registration, the snapshot metric wait, and the docker-exec control
//!   channel
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the capture service and wait until it reports running
//! db2-cdc-harness capture start --container db2server
//!
//! # Register a table for capture and sit out the propagation delay
//! db2-cdc-harness table enable --schema DB2INST1 --table ORDERS --wait
//!
//! # Flip an already-registered table off and on
//! db2-cdc-harness table deactivate --schema DB2INST1 --table ORDERS
//! db2-cdc-harness table activate --schema DB2INST1 --table ORDERS
//! ```

use clap::Parser;

pub mod config;
pub mod testing;

// Re-export the member crates for convenience
pub use convergence;
pub use db2_cdc_harness_capture as capture;

/// Db2 container connection options.
#[derive(Parser, Clone, Debug)]
pub struct Db2Opts {
    /// Name of the container running Db2 and the ASN capture scripts
    #[arg(long, default_value = "db2server", env = "DB2_CDC_CONTAINER")]
    pub container: String,

    /// Database the capture service runs against
    #[arg(long, default_value = "testdb", env = "DB2_CDC_DATABASE")]
    pub database: String,

    /// Instance user the db2 CLI runs as
    #[arg(long, default_value = "db2inst1", env = "DB2_CDC_USER")]
    pub user: String,
}

impl Db2Opts {
    /// Control channel into the configured container.
    pub fn channel(&self) -> capture::DockerChannel {
        capture::DockerChannel::new(&self.container, &self.database, &self.user)
    }
}

/// Timing options; parsed into [`capture::CaptureTimings`].
#[derive(Parser, Clone, Debug)]
pub struct TimingOpts {
    /// Interval between status/metric polls (e.g. "1s", "30s", "2m")
    #[arg(long, default_value = "1s")]
    pub poll_interval: String,

    /// Status poll attempts before service start gives up
    #[arg(long, default_value_t = 30)]
    pub start_attempts: u32,

    /// Metric poll attempts before the snapshot wait gives up
    #[arg(long, default_value_t = 60)]
    pub snapshot_attempts: u32,

    /// Pause after registration changes with no completion signal
    #[arg(long, default_value = "15s")]
    pub propagation_delay: String,
}

impl TimingOpts {
    pub fn to_timings(&self) -> anyhow::Result<capture::CaptureTimings> {
        Ok(capture::CaptureTimings {
            poll_interval: config::parse_duration(&self.poll_interval)?,
            start_attempts: self.start_attempts,
            snapshot_attempts: self.snapshot_attempts,
            propagation_delay: config::parse_duration(&self.propagation_delay)?,
        })
    }
}
