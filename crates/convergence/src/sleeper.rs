//! Interruptible sleep primitives used between poll attempts.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Result of a single pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// The full duration elapsed.
    Elapsed,
    /// The pause ended early. The external state the caller was waiting out
    /// is indeterminate at this point.
    Interrupted,
}

/// A steady, interruptible "pause for duration" primitive.
///
/// Poll loops go through this trait instead of calling
/// `tokio::time::sleep` directly, so tests can substitute a sleeper that
/// returns instantly and a test runner can abort a long wait early.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn pause(&self, duration: Duration) -> Pause;
}

/// Sleeper backed by the tokio timer. Never interrupts.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn pause(&self, duration: Duration) -> Pause {
        tokio::time::sleep(duration).await;
        Pause::Elapsed
    }
}

/// Sleeper that ends a pause early when the given token is cancelled.
#[derive(Debug, Clone)]
pub struct TokenSleeper {
    token: CancellationToken,
}

impl TokenSleeper {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl Sleeper for TokenSleeper {
    async fn pause(&self, duration: Duration) -> Pause {
        tokio::select! {
            _ = self.token.cancelled() => Pause::Interrupted,
            _ = tokio::time::sleep(duration) => Pause::Elapsed,
        }
    }
}
