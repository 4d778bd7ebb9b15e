//! flux-sandbox
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http (router, style adapter)
//!                          │
//!                          ▼
//!                     service (fetch / fetch_and_store)
//!                       │                  │
//!                       ▼                  ▼
//!                   upstream            storage
//!              (breaker + timeout)     (SQLite)
//!                       │
//!                       ▼
//!                 remote dependency
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use flux_sandbox::config::{load_config, SandboxConfig};
use flux_sandbox::lifecycle::{self, signals, Shutdown};
use flux_sandbox::observability::{logging, metrics};
use flux_sandbox::HttpServer;

#[derive(Parser)]
#[command(name = "flux-sandbox")]
#[command(about = "Same endpoints, several concurrency styles, one resilient remote call")]
struct Args {
    /// Path to a TOML config file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SandboxConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("flux-sandbox v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url(),
        database = %config.database.url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let service = lifecycle::build_service(&config).await?;
    let store = service.store().clone();

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);

    let server = HttpServer::new(config, service);
    server.run(listener, shutdown.subscribe()).await?;

    store.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
