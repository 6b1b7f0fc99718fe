//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ServerConfig (host, port)
//!     → listener.rs (resolve, bind, ephemeral port)
//! ServerConfig (cert_file, key_file)
//!     → tls.rs (load PEM material into rustls config)
//!     → handed to the HTTP server at start
//! ```
//!
//! # Design Decisions
//! - The listener is bound during init, before the server can serve
//! - TLS is optional and selected purely by configuration

pub mod listener;
pub mod tls;

pub use listener::{Listener, ListenerError};
pub use tls::{load_tls_config, TlsError};
