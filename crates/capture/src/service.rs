//! Capture service lifecycle control.

use std::fmt;
use std::sync::Arc;

use convergence::{wait_until, Outcome, Pause, Probe, PropagationDelay, RetryBudget, Sleeper};
use tracing::{debug, info};

use crate::{statements, CaptureError, CaptureTimings, ControlChannel};

/// Externally observed state of the capture service.
///
/// Only ever produced by mapping the status query result; the controller
/// never sets it optimistically after issuing a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureServiceState {
    Stopped,
    /// The status query returns no row yet.
    Starting,
    Running,
    Unknown,
}

impl fmt::Display for CaptureServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaptureServiceState::Stopped => "stopped",
            CaptureServiceState::Starting => "starting",
            CaptureServiceState::Running => "running",
            CaptureServiceState::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Start, stop, and status-check of the whole-database capture service.
pub struct CaptureService<C> {
    channel: Arc<C>,
    timings: CaptureTimings,
    sleeper: Arc<dyn Sleeper>,
}

impl<C> Clone for CaptureService<C> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
            timings: self.timings,
            sleeper: self.sleeper.clone(),
        }
    }
}

impl<C: ControlChannel> CaptureService<C> {
    pub fn new(channel: Arc<C>, timings: CaptureTimings, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            channel,
            timings,
            sleeper,
        }
    }

    pub(crate) fn channel(&self) -> &C {
        &self.channel
    }

    pub(crate) fn sleeper(&self) -> &dyn Sleeper {
        self.sleeper.as_ref()
    }

    pub fn timings(&self) -> &CaptureTimings {
        &self.timings
    }

    /// Issue the start command once, then poll status until the service
    /// reports itself running.
    ///
    /// A timeout or a failing status query maps to
    /// [`CaptureError::ServiceStartTimeout`] wrapping the underlying wait
    /// error; an interrupted poll returns [`Outcome::Interrupted`] and
    /// leaves the service state indeterminate.
    pub async fn start(&self) -> Result<Outcome, CaptureError> {
        self.channel.execute(statements::START_CAPTURE).await?;
        info!("capture service start issued, polling status");

        let channel = self.channel.clone();
        wait_until(
            "capture service running",
            move || {
                let channel = channel.clone();
                async move {
                    let rows = channel.query(statements::CAPTURE_STATUS).await?;
                    Ok(match map_status(&rows) {
                        CaptureServiceState::Running => Probe::Converged,
                        _ => Probe::Pending,
                    })
                }
            },
            self.timings.poll_interval,
            RetryBudget::Attempts(self.timings.start_attempts),
            self.sleeper.as_ref(),
        )
        .await
        .map_err(CaptureError::ServiceStartTimeout)
    }

    /// Issue the stop command once.
    ///
    /// Fire-and-forget by design: starting needs confirmation before a
    /// scenario can proceed, stopping does not block test progress, so no
    /// status poll follows.
    pub async fn stop(&self) -> Result<(), CaptureError> {
        self.channel.execute(statements::STOP_CAPTURE).await?;
        info!("capture service stop issued");
        Ok(())
    }

    /// Issue the reinit command once. Callers must wait for propagation
    /// separately; see [`CaptureService::refresh_and_wait`].
    pub async fn refresh(&self) -> Result<(), CaptureError> {
        self.channel.execute(statements::REINIT_CAPTURE).await?;
        debug!("capture service reinit issued");
        Ok(())
    }

    /// [`CaptureService::refresh`] followed by the fixed propagation delay.
    pub async fn refresh_and_wait(&self) -> Result<Pause, CaptureError> {
        self.refresh().await?;
        Ok(PropagationDelay::new(self.timings.propagation_delay)
            .wait(self.sleeper.as_ref())
            .await)
    }

    /// Map the status query result to a service state.
    pub async fn status(&self) -> Result<CaptureServiceState, CaptureError> {
        let rows = self.channel.query(statements::CAPTURE_STATUS).await?;
        let state = map_status(&rows);
        debug!("capture service status: {state}");
        Ok(state)
    }
}

fn map_status(rows: &[String]) -> CaptureServiceState {
    if rows.is_empty() {
        return CaptureServiceState::Starting;
    }
    if rows.iter().any(|r| r.contains(statements::RUNNING_MARKER)) {
        CaptureServiceState::Running
    } else if rows.iter().any(|r| r.contains(statements::STOPPED_MARKER)) {
        CaptureServiceState::Stopped
    } else {
        CaptureServiceState::Unknown
    }
}
