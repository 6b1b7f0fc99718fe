//! The underlying HTTP server object.
//!
//! # Responsibilities
//! - Hold the request handler attached by the user initializer
//! - Carry the shutdown handle used by the lifecycle controller
//! - Serve on a pre-bound listener, plaintext or TLS
//!
//! # Design Decisions
//! - HTTP/1.1 and HTTP/2 come from axum-server (hyper) unchanged
//! - Graceful shutdown completing is a clean return, not an error

use std::net::SocketAddr;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;

/// An HTTP server that has a bound address but is not serving yet.
///
/// Initializers receive `&mut HttpServer` and attach request handling with
/// [`set_router`](HttpServer::set_router) or [`merge`](HttpServer::merge).
pub struct HttpServer {
    router: Router,
    handle: Handle,
    local_addr: SocketAddr,
    tls: Option<RustlsConfig>,
}

impl HttpServer {
    pub(crate) fn new(local_addr: SocketAddr, tls: Option<RustlsConfig>) -> Self {
        Self {
            router: Router::new(),
            handle: Handle::new(),
            local_addr,
            tls,
        }
    }

    /// Replace the request handler.
    pub fn set_router(&mut self, router: Router) {
        self.router = router;
    }

    /// Merge additional routes into the current handler.
    pub fn merge(&mut self, router: Router) {
        let current = std::mem::take(&mut self.router);
        self.router = current.merge(router);
    }

    /// The address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether connections will be TLS-terminated.
    pub fn is_tls(&self) -> bool {
        self.tls.is_some()
    }

    pub(crate) fn handle(&self) -> Handle {
        self.handle.clone()
    }

    /// Run the accept loop until the handle requests shutdown.
    pub(crate) async fn serve(self, listener: std::net::TcpListener) -> std::io::Result<()> {
        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        match self.tls {
            Some(tls) => {
                axum_server::tls_rustls::from_tcp_rustls(listener, tls)
                    .handle(self.handle)
                    .serve(app)
                    .await
            }
            None => {
                axum_server::from_tcp(listener)
                    .handle(self.handle)
                    .serve(app)
                    .await
            }
        }
    }
}

impl std::fmt::Debug for HttpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpServer")
            .field("local_addr", &self.local_addr)
            .field("tls", &self.is_tls())
            .finish()
    }
}
