//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request timeout, request ID, peer address)
//! - Bind server to listener and stop on shutdown

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::FixtureConfig;
use crate::http::echo::{echo_source_ip, record_remote_addr};
use crate::http::relay::{self, Relay};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::startup;
use crate::observability::tracing::request_span;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

/// HTTP server for the forwarding fixture.
pub struct HttpServer {
    router: Router,
    config: FixtureConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: FixtureConfig) -> Self {
        let state = AppState {
            relay: Arc::new(Relay::new(&config.timeouts, &config.relay)),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &FixtureConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/echosourceip", get(echo_source_ip))
            .route("/proxy", get(relay::missing_destination))
            .route("/proxy/", get(relay::missing_destination))
            .route("/proxy/{*destination}", get(relay::proxy))
            .with_state(state)
            .layer(middleware::from_fn(record_remote_addr))
            .layer(TimeoutLayer::new(config.timeouts.request()))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for driving in-process with `oneshot`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(
            upstream_timeout_secs = self.config.timeouts.upstream_secs,
            request_timeout_secs = self.config.timeouts.request_secs,
            "Forwarding fixture starting"
        );
        startup::serve(self.router, listener, shutdown).await
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }
}

/// Liveness answer for the platform's health check.
async fn index() -> &'static str {
    "ok"
}
