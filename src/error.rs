//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::health::HealthError;
use crate::lifecycle::shutdown::ShutdownError;
use crate::lifecycle::State;
use crate::net::{ListenerError, TlsError};
use crate::service::InjectionError;

/// Errors raised by user code (initializers, handlers wiring).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by the server lifecycle operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Registering the health token failed.
    #[error(transparent)]
    Health(#[from] HealthError),

    /// Settings could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Address resolution or bind failure.
    #[error(transparent)]
    Listener(#[from] ListenerError),

    /// TLS material could not be loaded.
    #[error(transparent)]
    Tls(#[from] TlsError),

    /// A required service was missing or had the wrong type.
    #[error(transparent)]
    Injection(#[from] InjectionError),

    /// The user initializer failed; its message is passed through unchanged.
    #[error(transparent)]
    Initializer(BoxError),

    /// The accept loop terminated for a reason other than shutdown.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    /// Graceful drain did not finish in time.
    #[error(transparent)]
    Shutdown(#[from] ShutdownError),

    /// A lifecycle operation was called in a state that does not allow it.
    #[error("cannot {operation} a server in state {state}")]
    InvalidState { operation: &'static str, state: State },

    /// A supervised process task panicked or was cancelled.
    #[error("process task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    /// True for the deadline-exceeded class of shutdown failures.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Error::Shutdown(ShutdownError::DeadlineExceeded(_)))
    }
}
