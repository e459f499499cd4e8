//! Forwarding proxy fixture.
//!
//! ```text
//!     test runner ──GET /proxy/app.istio.apps.internal:8080──▶ proxy app
//!                                                                │
//!                                        GET http://app.istio.apps.internal:8080/
//!                                                                ▼
//!     test runner ◀──────────── status + body, unchanged ─── internal route
//! ```
//!
//! Also answers `GET /echosourceip` with the caller's address and `GET /`
//! with `ok` for the platform health check.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use routing_fixtures::config::load_config;
use routing_fixtures::http::HttpServer;
use routing_fixtures::lifecycle::{signals, Shutdown};
use routing_fixtures::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "proxy")]
#[command(about = "Forwarding and source-IP echo fixture", long_about = None)]
struct Args {
    /// Optional TOML config file; `PORT` in the environment overrides the bind address.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability);

    tracing::info!("proxy fixture v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
