//! TLS configuration and certificate loading.

use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;

use crate::config::ServerConfig;

/// Error type for loading TLS material.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("{kind} file not found: {path:?}")]
    NotFound { kind: &'static str, path: PathBuf },

    #[error("failed to load TLS material from {cert:?} and {key:?}: {source}")]
    Load {
        cert: PathBuf,
        key: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load the rustls configuration for `config`, or `None` for plaintext.
///
/// Expects the cert/key pair to have passed validation already.
pub async fn load_tls_config(config: &ServerConfig) -> Result<Option<RustlsConfig>, TlsError> {
    if !config.tls_enabled() {
        return Ok(None);
    }

    let cert = Path::new(&config.cert_file);
    let key = Path::new(&config.key_file);
    for (kind, path) in [("certificate", cert), ("private key", key)] {
        if !path.exists() {
            return Err(TlsError::NotFound {
                kind,
                path: path.to_path_buf(),
            });
        }
    }

    let tls = RustlsConfig::from_pem_file(cert, key)
        .await
        .map_err(|source| TlsError::Load {
            cert: cert.to_path_buf(),
            key: key.to_path_buf(),
            source,
        })?;

    tracing::debug!(cert = ?cert, key = ?key, "TLS material loaded");
    Ok(Some(tls))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plaintext_loads_nothing() {
        let tls = load_tls_config(&ServerConfig::default()).await.unwrap();
        assert!(tls.is_none());
    }

    #[tokio::test]
    async fn missing_certificate_is_not_found() {
        let config = ServerConfig {
            cert_file: "does/not/exist.crt".into(),
            key_file: "does/not/exist.key".into(),
            ..ServerConfig::default()
        };

        let err = load_tls_config(&config).await.unwrap_err();
        assert!(matches!(err, TlsError::NotFound { kind: "certificate", .. }));
    }

    #[tokio::test]
    async fn garbage_pem_fails_to_load() {
        let dir = std::env::temp_dir().join(format!("httpbase-tls-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let cert = dir.join("bad.crt");
        let key = dir.join("bad.key");
        std::fs::write(&cert, "not a certificate").unwrap();
        std::fs::write(&key, "not a key").unwrap();

        let config = ServerConfig {
            cert_file: cert.to_string_lossy().into_owned(),
            key_file: key.to_string_lossy().into_owned(),
            ..ServerConfig::default()
        };

        let err = load_tls_config(&config).await.unwrap_err();
        assert!(matches!(err, TlsError::Load { .. }));
    }
}
