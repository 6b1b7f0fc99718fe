//! User initializer contract.
//!
//! The initializer is the only place request handling is wired. It first has
//! its collaborators injected from the service container, then receives the
//! bound-but-not-serving [`HttpServer`] to attach routes to. It must not start
//! or stop the server itself.

use async_trait::async_trait;

use crate::error::BoxError;
use crate::http::server::HttpServer;
use crate::service::{InjectionError, ServiceContainer};

/// Attaches request handling to a server during init.
#[async_trait]
pub trait ServerInitializer: Send + Sync {
    /// Resolve required collaborators from `services`.
    ///
    /// Called before [`init`](ServerInitializer::init). The default needs nothing.
    fn inject(&mut self, _services: &ServiceContainer) -> Result<(), InjectionError> {
        Ok(())
    }

    /// Attach request handling to `server`.
    async fn init(&mut self, server: &mut HttpServer) -> Result<(), BoxError>;
}

/// Adapter turning a closure into a [`ServerInitializer`].
pub struct InitializerFn<F>(F);

/// Use a plain closure as the initializer.
///
/// ```rust,no_run
/// use axum::{routing::get, Router};
/// use httpbase::http::initializer_fn;
///
/// let initializer = initializer_fn(|server| {
///     server.set_router(Router::new().route("/", get(|| async { "hello" })));
///     Ok(())
/// });
/// ```
pub fn initializer_fn<F>(f: F) -> InitializerFn<F>
where
    F: FnMut(&mut HttpServer) -> Result<(), BoxError> + Send + Sync,
{
    InitializerFn(f)
}

#[async_trait]
impl<F> ServerInitializer for InitializerFn<F>
where
    F: FnMut(&mut HttpServer) -> Result<(), BoxError> + Send + Sync,
{
    async fn init(&mut self, server: &mut HttpServer) -> Result<(), BoxError> {
        (self.0)(server)
    }
}
