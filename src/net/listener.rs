//! TCP listener factory.
//!
//! # Responsibilities
//! - Resolve `host:port` (names, IPv4 and IPv6 literals)
//! - Bind the first resolved address, including ephemeral port `0`
//! - Report the actually bound address
//!
//! # Design Decisions
//! - No retry: resolution and bind failures are fatal to init
//! - Empty host binds every IPv4 interface

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to resolve the configured host.
    #[error("failed to resolve {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// Failed to bind to the resolved address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// A bound TCP listener that remembers the address it actually got.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Resolve `host` and `port` and bind to the first resolved address.
    pub async fn bind(host: &str, port: u16) -> Result<Self, ListenerError> {
        let lookup_host = if host.is_empty() { "0.0.0.0" } else { host };

        let resolve_error = |source| ListenerError::Resolve {
            host: host.to_string(),
            port,
            source,
        };

        let addr = tokio::net::lookup_host((lookup_host, port))
            .await
            .map_err(resolve_error)?
            .next()
            .ok_or_else(|| {
                resolve_error(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no addresses found",
                ))
            })?;

        let inner = TcpListener::bind(addr)
            .await
            .map_err(|source| ListenerError::Bind { addr, source })?;

        let local_addr = inner
            .local_addr()
            .map_err(|source| ListenerError::Bind { addr, source })?;

        tracing::debug!(
            requested = %addr,
            address = %local_addr,
            "Listener bound"
        );

        Ok(Self { inner, local_addr })
    }

    /// The bound address. With port `0` this carries the OS-assigned port.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Hand the socket over to a server that drives its own accept loop.
    pub fn into_std(self) -> std::io::Result<std::net::TcpListener> {
        let listener = self.inner.into_std()?;
        listener.set_nonblocking(true)?;
        Ok(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ephemeral_port_is_assigned() {
        let listener = Listener::bind("127.0.0.1", 0).await.unwrap();
        let addr = listener.local_addr();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn empty_host_binds_all_interfaces() {
        let listener = Listener::bind("", 0).await.unwrap();
        assert!(listener.local_addr().ip().is_unspecified());
    }

    #[tokio::test]
    async fn port_in_use_is_a_bind_error() {
        let first = Listener::bind("127.0.0.1", 0).await.unwrap();
        let port = first.local_addr().port();

        let err = Listener::bind("127.0.0.1", port).await.unwrap_err();
        assert!(matches!(err, ListenerError::Bind { .. }));
    }

    #[tokio::test]
    async fn unresolvable_host_is_a_resolve_error() {
        let err = Listener::bind("host.invalid", 0).await.unwrap_err();
        assert!(matches!(err, ListenerError::Resolve { .. }));
    }

    #[tokio::test]
    async fn into_std_keeps_address() {
        let listener = Listener::bind("127.0.0.1", 0).await.unwrap();
        let addr = listener.local_addr();
        let std_listener = listener.into_std().unwrap();
        assert_eq!(std_listener.local_addr().unwrap(), addr);
    }
}
