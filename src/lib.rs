//! Managed HTTP(S) server lifecycle.
//!
//! A [`Server`] owns one listening HTTP server from bind to shutdown:
//! it registers with a [`Health`] registry, loads its settings from a
//! [`Config`] source, binds a listener (ephemeral ports included), injects
//! collaborators into a user [`ServerInitializer`], lets it attach routes,
//! serves plaintext or TLS, and shuts down exactly once within a deadline.

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod service;

pub use config::{Config, EnvTagPrefixer, ServerConfig, TagModifier};
pub use error::{BoxError, Error};
pub use health::{Health, HealthToken};
pub use http::{initializer_fn, HttpServer, ServerInitializer};
pub use lifecycle::{shutdown_signal, Process, ProcessContext, Server, State, Supervisor};
pub use service::ServiceContainer;
