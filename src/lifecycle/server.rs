//! Managed HTTP server lifecycle.
//!
//! # Responsibilities
//! - init: register health, load config, bind, inject, run the initializer
//! - start: report healthy, serve (plaintext or TLS), release resources
//! - stop: exactly-once graceful drain bounded by the shutdown timeout
//!
//! # Concurrency
//! `init` takes `&mut self` and finishes before anything else runs. `start`
//! and `stop` take `&self`, so a host shares the server through an `Arc` and
//! calls them from independent tasks. A short-held mutex guards the state
//! and the not-yet-served resources; the shutdown guard serializes `stop`.
//!
//! An instance is single-use: once stopped it never serves again.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum_server::Handle;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::config::{ServerConfig, TagModifier};
use crate::error::Error;
use crate::health::{ComponentStatus, HealthToken};
use crate::http::{HttpServer, ServerInitializer};
use crate::lifecycle::shutdown::{ShutdownError, ShutdownGuard};
use crate::lifecycle::{Process, ProcessContext, State};
use crate::net::{load_tls_config, Listener};

/// Resources created by init and consumed by start.
struct Resources {
    listener: Listener,
    server: HttpServer,
}

struct Inner {
    state: State,
    resources: Option<Resources>,
}

/// Set once init has succeeded; read-only afterwards.
struct Resolved {
    config: ServerConfig,
    local_addr: SocketAddr,
    handle: Handle,
    status: Arc<ComponentStatus>,
}

/// A managed HTTP(S) server.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use axum::{routing::get, Router};
/// use httpbase::{initializer_fn, Config, ProcessContext, Server};
///
/// # async fn run() -> Result<(), httpbase::Error> {
/// let context = ProcessContext::new(Config::from_env());
/// let mut server = Server::new(
///     initializer_fn(|server| {
///         server.set_router(Router::new().route("/", get(|| async { "hello" })));
///         Ok(())
///     }),
///     context,
/// );
///
/// server.init().await?;
/// let server = Arc::new(server);
///
/// let serving = tokio::spawn({
///     let server = Arc::clone(&server);
///     async move { server.start().await }
/// });
///
/// httpbase::shutdown_signal().await;
/// server.stop().await?;
/// # let _ = serving.await;
/// # Ok(())
/// # }
/// ```
pub struct Server<I> {
    name: String,
    initializer: I,
    context: ProcessContext,
    tag_modifiers: Vec<Box<dyn TagModifier>>,
    health_token: HealthToken,
    resolved: Option<Resolved>,
    inner: Mutex<Inner>,
    shutdown: ShutdownGuard,
    serving_done: watch::Sender<bool>,
}

impl<I: ServerInitializer> Server<I> {
    /// Create a server that will hand its `HttpServer` to `initializer` during init.
    pub fn new(initializer: I, context: ProcessContext) -> Self {
        let (serving_done, _) = watch::channel(false);
        Self {
            name: "http-server".to_string(),
            initializer,
            context,
            tag_modifiers: Vec::new(),
            health_token: HealthToken::new(),
            resolved: None,
            inner: Mutex::new(Inner {
                state: State::Created,
                resources: None,
            }),
            shutdown: ShutdownGuard::new(),
            serving_done,
        }
    }

    /// Name used in logs and by the supervisor.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Rewrite configuration keys, e.g. with an
    /// [`EnvTagPrefixer`](crate::config::EnvTagPrefixer), so several servers
    /// can read disjoint settings in one process.
    pub fn with_tag_modifier(mut self, modifier: impl TagModifier + 'static) -> Self {
        self.tag_modifiers.push(Box::new(modifier));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health_token(&self) -> HealthToken {
        self.health_token
    }

    pub fn state(&self) -> State {
        self.inner.lock().state
    }

    /// Settings resolved during init.
    pub fn config(&self) -> Option<&ServerConfig> {
        self.resolved.as_ref().map(|r| &r.config)
    }

    /// Bound address, available as soon as init succeeds.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.resolved.as_ref().map(|r| r.local_addr)
    }

    /// Bind, inject and let the initializer attach request handling.
    ///
    /// Any failure leaves the instance unusable. The health token stays
    /// registered but never reports healthy.
    pub async fn init(&mut self) -> Result<(), Error> {
        let state = self.inner.get_mut().state;
        if state != State::Created {
            return Err(Error::InvalidState {
                operation: "init",
                state,
            });
        }

        let status = self.context.health.register(self.health_token)?;

        let config = self.context.config.load_server_config(&self.tag_modifiers)?;

        let listener = Listener::bind(&config.host, config.port).await?;
        let local_addr = listener.local_addr();

        let tls = load_tls_config(&config).await?;
        let mut server = HttpServer::new(local_addr, tls);

        self.initializer.inject(&self.context.services)?;

        self.initializer
            .init(&mut server)
            .await
            .map_err(Error::Initializer)?;

        self.resolved = Some(Resolved {
            config,
            local_addr,
            handle: server.handle(),
            status,
        });

        let inner = self.inner.get_mut();
        inner.resources = Some(Resources { listener, server });
        inner.state = State::Initialized;

        tracing::debug!(
            name = %self.name,
            address = %local_addr,
            token = %self.health_token,
            "HTTP server initialized"
        );
        Ok(())
    }

    /// Serve until stopped. Returns `Ok` when `stop` ended the accept loop.
    ///
    /// On a server that was stopped before it started this returns `Ok`
    /// immediately without serving.
    pub async fn start(&self) -> Result<(), Error> {
        let resources = {
            let mut inner = self.inner.lock();
            match inner.state {
                State::Initialized => {}
                State::Stopped => {
                    tracing::debug!(name = %self.name, "HTTP server stopped before start, not serving");
                    return Ok(());
                }
                state => {
                    return Err(Error::InvalidState {
                        operation: "start",
                        state,
                    })
                }
            }

            match inner.resources.take() {
                Some(resources) => {
                    inner.state = State::Serving;
                    resources
                }
                None => {
                    return Err(Error::InvalidState {
                        operation: "start",
                        state: inner.state,
                    })
                }
            }
        };

        // Resources only exist after a successful init, which also resolves.
        let Some(resolved) = self.resolved.as_ref() else {
            return Err(Error::InvalidState {
                operation: "start",
                state: State::Created,
            });
        };

        let result = self.serve(resolved, resources).await;

        resolved.status.update(false);
        self.inner.lock().state = State::Stopped;
        self.serving_done.send_replace(true);

        if let Err(e) = &result {
            tracing::error!(name = %self.name, error = %e, "HTTP server failed");
        }
        result
    }

    async fn serve(&self, resolved: &Resolved, resources: Resources) -> Result<(), Error> {
        let Resources { listener, server } = resources;
        let listener = listener.into_std().map_err(Error::Serve)?;
        let scheme = if server.is_tls() { "HTTP/TLS" } else { "HTTP" };

        resolved.status.update(true);

        tracing::info!(
            name = %self.name,
            address = %resolved.local_addr,
            "Serving {} on {}:{}",
            scheme,
            resolved.config.host,
            resolved.local_addr.port()
        );

        server.serve(listener).await.map_err(Error::Serve)?;

        tracing::info!(
            name = %self.name,
            "No longer serving {} on {}:{}",
            scheme,
            resolved.config.host,
            resolved.local_addr.port()
        );
        Ok(())
    }

    /// Shut the server down. Concurrent and repeated calls run the sequence
    /// once and all return its outcome.
    ///
    /// A server that never started is simply marked stopped. A serving one is
    /// drained gracefully; if that outlasts the shutdown timeout the remaining
    /// connections are closed and [`ShutdownError::DeadlineExceeded`] is returned.
    pub async fn stop(&self) -> Result<(), Error> {
        self.shutdown
            .run(|| self.shutdown_sequence())
            .await
            .map_err(Error::from)
    }

    async fn shutdown_sequence(&self) -> Result<(), ShutdownError> {
        let serving = {
            let mut inner = self.inner.lock();
            let serving = inner.state == State::Serving;
            if !serving {
                inner.state = State::Stopped;
                inner.resources = None;
            }
            serving
        };

        let resolved = match (&self.resolved, serving) {
            (Some(resolved), true) => resolved,
            _ => {
                tracing::debug!(name = %self.name, "HTTP server not serving, nothing to drain");
                return Ok(());
            }
        };

        let timeout = resolved.config.shutdown_timeout;
        tracing::info!(name = %self.name, timeout = ?timeout, "Shutting down HTTP server");

        resolved.handle.graceful_shutdown(None);

        let mut done = self.serving_done.subscribe();
        let drained = tokio::time::timeout(timeout, done.wait_for(|done| *done))
            .await
            .is_ok();
        if drained {
            return Ok(());
        }

        tracing::warn!(
            name = %self.name,
            connections = resolved.handle.connection_count(),
            "Graceful shutdown deadline exceeded, closing remaining connections"
        );
        resolved.handle.shutdown();
        Err(ShutdownError::DeadlineExceeded(timeout))
    }
}

#[async_trait]
impl<I: ServerInitializer> Process for Server<I> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn init(&mut self) -> Result<(), Error> {
        Server::init(self).await
    }

    async fn start(&self) -> Result<(), Error> {
        Server::start(self).await
    }

    async fn stop(&self) -> Result<(), Error> {
        Server::stop(self).await
    }
}

impl<I> std::fmt::Debug for Server<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("name", &self.name)
            .field("health_token", &self.health_token)
            .field("state", &self.inner.lock().state)
            .field("local_addr", &self.resolved.as_ref().map(|r| r.local_addr))
            .finish()
    }
}
