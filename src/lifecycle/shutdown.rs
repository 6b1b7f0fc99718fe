//! Shutdown coordination.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::OnceCell;

/// Outcome of a failed shutdown sequence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShutdownError {
    /// In-flight connections outlived the drain deadline and were closed.
    #[error("graceful shutdown did not finish within {0:?}: deadline exceeded")]
    DeadlineExceeded(Duration),
}

/// Runs a shutdown sequence exactly once across any number of callers.
///
/// Every caller waits for the single run to finish and receives its outcome.
#[derive(Debug, Default)]
pub struct ShutdownGuard {
    outcome: OnceCell<Result<(), ShutdownError>>,
}

impl ShutdownGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `sequence` if no caller has yet, otherwise wait for that run.
    pub async fn run<F, Fut>(&self, sequence: F) -> Result<(), ShutdownError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ShutdownError>>,
    {
        self.outcome.get_or_init(sequence).await.clone()
    }

    /// Whether the sequence has completed.
    pub fn has_run(&self) -> bool {
        self.outcome.initialized()
    }
}
