//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (name, address, token, timeout)
//!
//! The host binary installs:
//!     → logging.rs (EnvFilter + fmt layer, plain or JSON)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is the host's call
//! - Logging never influences control flow

pub mod logging;

pub use logging::{init_logging, LogFormat};
