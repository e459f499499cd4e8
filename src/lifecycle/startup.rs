//! Startup orchestration shared by every fixture binary.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Peer addresses are captured for every connection (`ConnectInfo`)

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{load_config, ConfigError, FixtureConfig};

/// Config for a fixture that only needs a listener: defaults plus `PORT`.
pub fn platform_config() -> Result<FixtureConfig, ConfigError> {
    load_config(None)
}

/// Serve `router` on `listener` until `shutdown` fires, then drain.
pub async fn serve(
    router: Router,
    listener: TcpListener,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Listening for connections");

    let app = router.into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    tracing::info!(address = %addr, "HTTP server stopped");
    Ok(())
}
