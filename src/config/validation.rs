//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation after the typed load
//! - Enforce the TLS pair policy: certificate and key together or not at all
//!
//! # Design Decisions
//! - Pure function over `ServerConfig`
//! - Runs before the listener is bound, so a bad pair never leaves a socket open

use crate::config::loader::ConfigError;
use crate::config::schema::ServerConfig;

/// Validate a loaded server configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.cert_file.is_empty() != config.key_file.is_empty() {
        return Err(ConfigError::BadCertConfig);
    }

    Ok(())
}
