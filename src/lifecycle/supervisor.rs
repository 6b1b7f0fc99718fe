//! Process supervision.
//!
//! # Responsibilities
//! - Initialize registered processes in registration order
//! - Run every process concurrently
//! - Stop all processes on a shutdown signal or when any process exits
//!
//! # Design Decisions
//! - Init failures are fatal: already initialized processes are stopped
//! - Processes are stopped in reverse registration order
//! - The first error observed is returned; later ones are logged

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::error::Error;
use crate::lifecycle::Process;

/// Drives a set of [`Process`]es through init, start and stop.
#[derive(Default)]
pub struct Supervisor {
    processes: Vec<Box<dyn Process>>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a process. Processes are initialized in the order they are added.
    pub fn register(&mut self, process: impl Process + 'static) -> &mut Self {
        self.processes.push(Box::new(process));
        self
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Run until `shutdown` resolves or any process exits, then stop everything.
    pub async fn run<F>(self, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()>,
    {
        let mut initialized: Vec<Arc<dyn Process>> = Vec::with_capacity(self.processes.len());

        for mut process in self.processes {
            tracing::info!(process = process.name(), "Initializing process");
            if let Err(e) = process.init().await {
                tracing::error!(process = process.name(), error = %e, "Process failed to initialize");
                stop_all(&initialized).await;
                return Err(e);
            }
            initialized.push(Arc::from(process));
        }

        let mut running = JoinSet::new();
        for process in &initialized {
            let process = Arc::clone(process);
            running.spawn(async move {
                let result = process.start().await;
                (process.name().to_string(), result)
            });
        }

        let mut first_error: Option<Error> = None;

        tokio::pin!(shutdown);
        tokio::select! {
            () = &mut shutdown => {
                tracing::info!("Stopping processes");
            }
            Some(joined) = running.join_next() => {
                record_exit(joined, &mut first_error);
                tracing::warn!("A process exited, stopping the rest");
            }
        }

        if let Some(e) = stop_all(&initialized).await {
            first_error.get_or_insert(e);
        }

        while let Some(joined) = running.join_next().await {
            record_exit(joined, &mut first_error);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

async fn stop_all(processes: &[Arc<dyn Process>]) -> Option<Error> {
    let mut first_error = None;
    for process in processes.iter().rev() {
        if let Err(e) = process.stop().await {
            tracing::error!(process = process.name(), error = %e, "Process failed to stop cleanly");
            first_error.get_or_insert(e);
        }
    }
    first_error
}

fn record_exit(
    joined: Result<(String, Result<(), Error>), tokio::task::JoinError>,
    first_error: &mut Option<Error>,
) {
    match joined {
        Ok((name, Ok(()))) => {
            tracing::debug!(process = %name, "Process exited");
        }
        Ok((name, Err(e))) => {
            tracing::error!(process = %name, error = %e, "Process exited with error");
            first_error.get_or_insert(e);
        }
        Err(e) => {
            tracing::error!(error = %e, "Process task panicked");
            first_error.get_or_insert(Error::Join(e));
        }
    }
}
