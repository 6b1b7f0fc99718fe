//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use httpbase::health::ComponentStatus;
use httpbase::{Config, Error, ProcessContext, Server, ServerInitializer};
use tokio::task::JoinHandle;

pub const CERT_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/keys/server.crt");
pub const KEY_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/keys/server.key");

/// A context reading only the given settings.
pub fn context(pairs: &[(&str, &str)]) -> ProcessContext {
    ProcessContext::new(Config::from_pairs(pairs.iter().copied()))
}

/// Loopback, ephemeral port, plus any extra settings.
pub fn loopback_context(extra: &[(&str, &str)]) -> ProcessContext {
    let mut pairs = vec![("http_host", "127.0.0.1"), ("http_port", "0")];
    pairs.extend_from_slice(extra);
    context(&pairs)
}

/// `/users/foo` answers 200 "bar"; anything else is a 500.
pub fn users_router() -> Router {
    Router::new()
        .route("/users/foo", get(|| async { "bar" }))
        .fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR })
}

/// Run `start` in the background.
pub fn spawn_start<I>(server: &Arc<Server<I>>) -> JoinHandle<Result<(), Error>>
where
    I: ServerInitializer + 'static,
{
    let server = Arc::clone(server);
    tokio::spawn(async move { server.start().await })
}

/// Poll until `status` reports healthy, panicking after two seconds.
pub async fn wait_healthy(status: &ComponentStatus) {
    for _ in 0..200 {
        if status.is_healthy() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("component never reported healthy");
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

pub fn insecure_tls_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .danger_accept_invalid_certs(true)
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
