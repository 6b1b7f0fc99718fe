//! httpbase host binary.
//!
//! Runs two managed servers under one supervisor:
//!
//! ```text
//!   http_*        → application server (demo routes)
//!   probe_http_*  → readiness probe server (GET /healthz)
//! ```
//!
//! Settings come from an optional TOML file overlaid with the environment,
//! e.g. `HTTP_PORT=8080 PROBE_HTTP_PORT=8081 httpbase`.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::Path, routing::get, Router};
use clap::Parser;
use tower_http::trace::TraceLayer;

use httpbase::config::{Config, EnvTagPrefixer};
use httpbase::health::probe_router;
use httpbase::observability::{init_logging, LogFormat};
use httpbase::{initializer_fn, shutdown_signal, ProcessContext, Server, Supervisor};

/// The application server defaults to 5000; keep the probe off that port.
const DEFAULT_PROBE_PORT: &str = "5001";

#[derive(Parser)]
#[command(name = "httpbase")]
#[command(about = "Managed HTTP(S) server host", long_about = None)]
struct Cli {
    /// TOML file with `http_*` settings; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    /// Print the resolved application server settings and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let format = if cli.log_json { LogFormat::Json } else { LogFormat::Plain };
    init_logging(format)?;

    let mut config = Config::from_pairs([("probe_http_port", DEFAULT_PROBE_PORT)]);
    if let Some(path) = &cli.config {
        config = config.merge(Config::from_toml_file(path)?);
    }
    config = config.merge(Config::from_env());

    if cli.print_config {
        let resolved = config.load_server_config(&[])?;
        print!("{}", toml::to_string_pretty(&resolved)?);
        return Ok(());
    }

    tracing::info!("httpbase v{} starting", env!("CARGO_PKG_VERSION"));

    let context = ProcessContext::new(config);

    let app = Server::new(
        initializer_fn(|server| {
            let router = Router::new()
                .route("/", get(|| async { "ok" }))
                .route("/echo/{message}", get(|Path(message): Path<String>| async move { message }))
                .layer(TraceLayer::new_for_http());
            server.set_router(router);
            Ok(())
        }),
        context.clone(),
    )
    .with_name("app");

    let health = Arc::clone(&context.health);
    let probe = Server::new(
        initializer_fn(move |server| {
            server.set_router(probe_router(Arc::clone(&health)));
            Ok(())
        }),
        context,
    )
    .with_name("probe")
    .with_tag_modifier(EnvTagPrefixer::new("probe"));

    let mut supervisor = Supervisor::new();
    supervisor.register(app).register(probe);
    supervisor.run(shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
