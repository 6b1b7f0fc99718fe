//! Health reporting subsystem.
//!
//! # Data Flow
//! ```text
//! Component construction:
//!     → token.rs (fresh UUID token per component)
//!
//! Component init:
//!     → registry.rs (register token, receive status handle)
//!
//! Component start/stop:
//!     → state.rs (flip status healthy / unhealthy)
//!
//! Readiness probes:
//!     → probe.rs (aggregate registry into 200 / 503)
//! ```
//!
//! # Design Decisions
//! - Registration is permanent for the life of the registry
//! - A registered component starts unhealthy
//! - The registry is healthy only when every registered component is

pub mod probe;
pub mod registry;
pub mod state;
pub mod token;

pub use probe::probe_router;
pub use registry::{Health, HealthError, HealthReport};
pub use state::ComponentStatus;
pub use token::HealthToken;
