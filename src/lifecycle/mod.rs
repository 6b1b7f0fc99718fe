//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Server (server.rs):
//!     Created --init--> Initialized --start--> Serving --(stop | error)--> Stopped
//!     Initialized --stop--> Stopped
//!
//! Shutdown (shutdown.rs):
//!     first stop call runs the drain; every caller gets its outcome
//!
//! Supervision (supervisor.rs, signals.rs):
//!     init all → start all → SIGTERM/SIGINT or first exit → stop all
//! ```
//!
//! # Design Decisions
//! - Fail fast: any init error is fatal and never retried
//! - Health goes up only right before the accept loop
//! - Shutdown has a deadline: overrunning it is reported, not hidden

pub mod server;
pub mod shutdown;
pub mod signals;
pub mod supervisor;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::Error;
use crate::health::Health;
use crate::service::ServiceContainer;

pub use server::Server;
pub use shutdown::{ShutdownError, ShutdownGuard};
pub use signals::shutdown_signal;
pub use supervisor::Supervisor;

/// Lifecycle state of a [`Server`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Created,
    Initialized,
    Serving,
    Stopped,
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            State::Created => "created",
            State::Initialized => "initialized",
            State::Serving => "serving",
            State::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Collaborators a host process hands to the components it runs.
#[derive(Debug, Clone, Default)]
pub struct ProcessContext {
    pub config: Arc<Config>,
    pub services: Arc<ServiceContainer>,
    pub health: Arc<Health>,
}

impl ProcessContext {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            ..Self::default()
        }
    }
}

/// A long-running component driven by a host supervisor.
#[async_trait]
pub trait Process: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Prepare resources. Runs to completion before `start` or `stop`.
    async fn init(&mut self) -> Result<(), Error>;

    /// Run until stopped or failed.
    async fn start(&self) -> Result<(), Error>;

    /// Ask a running `start` to return. Safe to call more than once.
    async fn stop(&self) -> Result<(), Error>;
}
