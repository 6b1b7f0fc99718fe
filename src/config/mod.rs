//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! environment / TOML file / explicit pairs
//!     → loader.rs (flat key/value source, tag modifiers)
//!     → schema.rs (typed ServerConfig)
//!     → validation.rs (semantic checks, TLS pair policy)
//!     → captured by the server lifecycle at init (immutable)
//! ```
//!
//! # Design Decisions
//! - One flat namespace of lowercase keys, whatever the source
//! - Tag modifiers rewrite keys so one process can host several servers
//! - Validation runs before any socket is opened

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{Config, ConfigError, EnvTagPrefixer, TagModifier};
pub use schema::ServerConfig;
