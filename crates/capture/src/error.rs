//! Capture controller errors.

use convergence::WaitError;
use thiserror::Error;

use crate::CommandError;

#[derive(Debug, Error)]
pub enum CaptureError {
    /// A control-channel call failed outside of a convergence wait.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The capture service never reported itself running. Wraps either the
    /// exhausted wait or the status failure that aborted it; the
    /// underlying error is never swallowed.
    #[error("capture service did not start")]
    ServiceStartTimeout(#[source] WaitError),

    /// The initial snapshot never reported completion.
    #[error("snapshot was not completed")]
    SnapshotTimeout(#[source] WaitError),

    /// A schema or table name failed validation before any statement was
    /// built; nothing reached the external system.
    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),
}
