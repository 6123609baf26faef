//! Initial-snapshot completion, observed via an external metrics endpoint.
//!
//! The capture connector exposes a boolean `SnapshotCompleted` attribute
//! on a per-server metrics endpoint. The endpoint only appears some time
//! after the connector starts, so "endpoint not found" is part of the
//! normal convergence path here, not a failure.

use async_trait::async_trait;
use convergence::{wait_until, Outcome, Probe, RetryBudget, Sleeper};
use thiserror::Error;

use crate::{CaptureError, CaptureTimings};

/// Attribute reported true once the initial snapshot has finished.
pub const SNAPSHOT_COMPLETED_ATTRIBUTE: &str = "SnapshotCompleted";

/// Metrics endpoint id for the snapshot metrics of `server`.
pub fn snapshot_endpoint(server: &str) -> String {
    format!("connector-metrics:snapshot:{server}")
}

/// Failure reading a metrics attribute.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The endpoint has not been registered yet.
    #[error("metrics endpoint {0:?} is not registered")]
    EndpointNotFound(String),

    /// Any other failure; aborts the wait.
    #[error("failed to read {attribute:?} of {endpoint:?}: {message}")]
    Attribute {
        endpoint: String,
        attribute: String,
        message: String,
    },
}

/// Boolean attributes exposed by an external metrics registry.
#[async_trait]
pub trait MetricsEndpoint: Send + Sync {
    async fn boolean_attribute(
        &self,
        endpoint: &str,
        attribute: &str,
    ) -> Result<bool, MetricsError>;
}

/// Poll the snapshot metrics of `server` until `SnapshotCompleted` reads
/// true.
///
/// [`MetricsError::EndpointNotFound`] counts as not-converged and is
/// retried; any other metrics failure aborts the wait with the error
/// wrapped in [`CaptureError::SnapshotTimeout`].
pub async fn wait_for_snapshot_completed(
    metrics: &dyn MetricsEndpoint,
    server: &str,
    timings: &CaptureTimings,
    sleeper: &dyn Sleeper,
) -> Result<Outcome, CaptureError> {
    let endpoint = snapshot_endpoint(server);

    wait_until(
        "snapshot completed",
        || {
            let endpoint = endpoint.clone();
            async move {
                match metrics
                    .boolean_attribute(&endpoint, SNAPSHOT_COMPLETED_ATTRIBUTE)
                    .await
                {
                    Ok(true) => Ok(Probe::Converged),
                    Ok(false) => Ok(Probe::Pending),
                    Err(MetricsError::EndpointNotFound(_)) => Ok(Probe::NotFound),
                    Err(e) => Err(e.into()),
                }
            }
        },
        timings.poll_interval,
        RetryBudget::Attempts(timings.snapshot_attempts),
        sleeper,
    )
    .await
    .map_err(CaptureError::SnapshotTimeout)
}
