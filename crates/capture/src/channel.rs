//! The control channel consumed by the capture controller.

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a control-channel call.
///
/// Surfaced to the caller immediately; the controller never retries a
/// failed command on its own.
#[derive(Debug, Error)]
#[error("control statement failed: {statement}: {message}")]
pub struct CommandError {
    statement: String,
    message: String,
}

impl CommandError {
    pub fn new(statement: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            message: message.into(),
        }
    }

    /// The statement that failed.
    pub fn statement(&self) -> &str {
        &self.statement
    }
}

/// Executes control statements against the database hosting the capture
/// service.
///
/// Every query the harness issues projects a single character column (the
/// status text, the registration state flag, concatenated names), so
/// `query` returns one trimmed string per row rather than taking a generic
/// row mapper.
#[async_trait]
pub trait ControlChannel: Send + Sync {
    /// Run a statement, discarding any result rows.
    async fn execute(&self, statement: &str) -> Result<(), CommandError>;

    /// Run a query, returning one trimmed character value per row. An
    /// empty result set is `Ok(vec![])`, not an error.
    async fn query(&self, statement: &str) -> Result<Vec<String>, CommandError>;
}
