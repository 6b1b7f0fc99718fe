//! Configuration schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Key for the bind host. Empty means all interfaces.
pub const HTTP_HOST: &str = "http_host";
/// Key for the bind port. `0` requests an ephemeral port.
pub const HTTP_PORT: &str = "http_port";
/// Key for the PEM certificate path.
pub const HTTP_CERT_FILE: &str = "http_cert_file";
/// Key for the PEM private key path.
pub const HTTP_KEY_FILE: &str = "http_key_file";
/// Key for the graceful drain deadline.
pub const HTTP_SHUTDOWN_TIMEOUT: &str = "http_shutdown_timeout";

/// Every key [`ServerConfig`] reads.
pub const SERVER_KEYS: [&str; 5] = [
    HTTP_HOST,
    HTTP_PORT,
    HTTP_CERT_FILE,
    HTTP_KEY_FILE,
    HTTP_SHUTDOWN_TIMEOUT,
];

/// Settings for one managed HTTP server.
///
/// Serialized under the same `http_*` keys it is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind; empty binds every interface.
    #[serde(rename = "http_host")]
    pub host: String,

    /// Port to bind; `0` lets the OS pick one.
    #[serde(rename = "http_port")]
    pub port: u16,

    /// Path to the certificate file (PEM).
    #[serde(rename = "http_cert_file")]
    pub cert_file: String,

    /// Path to the private key file (PEM).
    #[serde(rename = "http_key_file")]
    pub key_file: String,

    /// Upper bound on graceful drain during stop (`250ms`, `5s`).
    #[serde(rename = "http_shutdown_timeout", with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Whether TLS material was supplied.
    pub fn tls_enabled(&self) -> bool {
        !self.cert_file.is_empty()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 5000,
            cert_file: String::new(),
            key_file: String::new(),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}
