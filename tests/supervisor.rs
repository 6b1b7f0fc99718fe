//! Two servers in one process: tag modifiers, probe endpoint, supervision.

use std::sync::Arc;
use std::time::Duration;

use httpbase::health::probe_router;
use httpbase::net::Listener;
use httpbase::{initializer_fn, BoxError, EnvTagPrefixer, HttpServer, Server, Supervisor};
use tokio::sync::oneshot;

mod common;

async fn free_port() -> u16 {
    let listener = Listener::bind("127.0.0.1", 0).await.unwrap();
    listener.local_addr().port()
}

#[tokio::test]
async fn prefixed_probe_server_reports_readiness() {
    let app_port = free_port().await.to_string();
    let probe_port = free_port().await.to_string();

    let ctx = common::context(&[
        ("http_host", "127.0.0.1"),
        ("http_port", app_port.as_str()),
        ("probe_http_host", "127.0.0.1"),
        ("probe_http_port", probe_port.as_str()),
    ]);

    let app = Server::new(
        initializer_fn(|server: &mut HttpServer| -> Result<(), BoxError> {
            server.set_router(common::users_router());
            Ok(())
        }),
        ctx.clone(),
    )
    .with_name("app");

    let health = Arc::clone(&ctx.health);
    let probe = Server::new(
        initializer_fn(move |server: &mut HttpServer| -> Result<(), BoxError> {
            server.set_router(probe_router(Arc::clone(&health)));
            Ok(())
        }),
        ctx.clone(),
    )
    .with_name("probe")
    .with_tag_modifier(EnvTagPrefixer::new("probe"));

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut supervisor = Supervisor::new();
    supervisor.register(app).register(probe);
    let running = tokio::spawn(supervisor.run(async move {
        let _ = stop_rx.await;
    }));

    let client = common::http_client();
    let url = format!("http://127.0.0.1:{}/healthz", probe_port);

    let mut report = None;
    for _ in 0..200 {
        if let Ok(res) = client.get(&url).send().await {
            if res.status() == 200 {
                report = Some(res.json::<serde_json::Value>().await.unwrap());
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let report = report.expect("probe never reported ready");
    assert_eq!(report["healthy"], true);
    assert_eq!(report["components"].as_array().unwrap().len(), 2);

    let res = client
        .get(format!("http://127.0.0.1:{}/users/foo", app_port))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "bar");

    stop_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(10), running)
        .await
        .expect("supervisor did not stop")
        .unwrap()
        .unwrap();

    assert_eq!(ctx.health.len(), 2);
    assert!(!ctx.health.is_healthy());
}

#[tokio::test]
async fn bind_failure_aborts_supervisor() {
    let taken = Listener::bind("127.0.0.1", 0).await.unwrap();
    let port = taken.local_addr().port().to_string();

    let ctx = common::context(&[("http_host", "127.0.0.1"), ("http_port", port.as_str())]);
    let server = Server::new(
        initializer_fn(|_server: &mut HttpServer| -> Result<(), BoxError> { Ok(()) }),
        ctx,
    );

    let mut supervisor = Supervisor::new();
    supervisor.register(server);

    let err = supervisor
        .run(std::future::pending())
        .await
        .unwrap_err();
    assert!(matches!(err, httpbase::Error::Listener(_)));
}
