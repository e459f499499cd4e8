//! Backend that fails two requests out of three.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use routing_fixtures::fixtures::flaky::{self, FlakyCounter, DEFAULT_PERIOD};
use routing_fixtures::lifecycle::{signals, startup, Shutdown};
use routing_fixtures::observability::logging;

#[derive(Parser)]
#[command(name = "flaky-backend")]
#[command(about = "Answers 500 except on every Nth request", long_about = None)]
struct Args {
    /// Every Nth request succeeds.
    #[arg(long, default_value_t = DEFAULT_PERIOD)]
    period: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = startup::platform_config()?;
    logging::init_logging(&config.observability);

    tracing::info!(period = args.period, "flaky backend starting");

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let router = flaky::router(Arc::new(FlakyCounter::new(args.period)));
    startup::serve(router, listener, shutdown.subscribe()).await?;
    Ok(())
}
