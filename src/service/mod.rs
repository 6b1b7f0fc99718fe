//! Service container and dependency injection.
//!
//! # Data Flow
//! ```text
//! Host startup:
//!     container.set("redis", conn)        (initializers publish services)
//!
//! Server init:
//!     initializer.inject(&container)      (explicit, per-field lookups)
//!     → container.inject::<T>(field, key) (typed fetch, error names field)
//!     → initializer.init(&mut server)     (collaborators already resolved)
//! ```
//!
//! # Design Decisions
//! - No reflection: initializers resolve their own fields explicitly
//! - Fail fast on the first missing or mismatched service
//! - Services are shared as `Arc<T>`

pub mod container;

pub use container::{InjectionError, ServiceContainer, ServiceError};
