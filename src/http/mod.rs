//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Listener (bound during init)
//!     → server.rs (HttpServer: handler + shutdown handle + optional TLS)
//!     → initializer.rs (user attaches routes before serving)
//!     → axum-server accept loop (HTTP/1.1, HTTP/2, rustls)
//! ```

pub mod initializer;
pub mod server;

pub use initializer::{initializer_fn, InitializerFn, ServerInitializer};
pub use server::HttpServer;
