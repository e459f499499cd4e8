//! Forwarding relay.
//!
//! `GET /proxy/{host:port}` issues `GET http://{host:port}/` and hands the
//! destination's status and body back unchanged. Tests use it to reach
//! internal-only routes from outside the mesh and to sample weighted routes.
//!
//! # Design Decisions
//! - Every call is bounded by the upstream timeout (connect, head and body)
//! - No idle connections are pooled, so each relay opens a fresh connection
//!   and repeated samples are never pinned to one upstream instance
//! - Only `Content-Type` is copied from the upstream headers

use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, Method, Request},
    response::Response,
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::{RelayConfig, TimeoutConfig};
use crate::http::destination::{Destination, DestinationError};
use crate::http::error::RelayError;
use crate::http::request::{request_id_of, X_REQUEST_ID};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Outbound side of `/proxy`.
#[derive(Clone)]
pub struct Relay {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
    max_body_bytes: usize,
    user_agent: HeaderValue,
}

impl Relay {
    pub fn new(timeouts: &TimeoutConfig, config: &RelayConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeouts.connect()));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build(connector);

        let user_agent = HeaderValue::from_str(&config.user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("routing-fixtures"));

        Self {
            client,
            timeout: timeouts.upstream(),
            max_body_bytes: config.max_body_bytes,
            user_agent,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Relay one GET to `destination`, forwarding the caller's request ID.
    pub async fn forward(
        &self,
        destination: &Destination,
        request_id: Option<&HeaderValue>,
    ) -> Result<Response, RelayError> {
        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(destination.root_uri()?)
            .header(header::USER_AGENT, self.user_agent.clone());
        if let Some(id) = request_id {
            builder = builder.header(X_REQUEST_ID, id.clone());
        }
        let request = builder
            .body(Body::empty())
            .map_err(|e| DestinationError::InvalidHost {
                host: destination.host().to_string(),
                reason: e.to_string(),
            })?;

        let call = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|source| RelayError::Unreachable {
                    destination: destination.to_string(),
                    source,
                })?;

            let (parts, body) = response.into_parts();
            let bytes = read_body(body, self.max_body_bytes)
                .await
                .map_err(|e| RelayError::Body {
                    destination: destination.to_string(),
                    reason: e.to_string(),
                })?;

            Ok::<_, RelayError>((parts.status, parts.headers.get(header::CONTENT_TYPE).cloned(), bytes))
        };

        let (status, content_type, bytes) = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| RelayError::Timeout {
                destination: destination.to_string(),
                after: self.timeout,
            })??;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        if let Some(content_type) = content_type {
            response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        }
        Ok(response)
    }
}

/// Collect an upstream body, failing once it grows past `limit` bytes.
async fn read_body(body: Incoming, limit: usize) -> Result<Bytes, axum::Error> {
    axum::body::to_bytes(Body::new(body), limit).await
}

/// `GET /proxy/{*destination}`
pub async fn proxy(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    headers: HeaderMap,
) -> Result<Response, RelayError> {
    let start_time = Instant::now();
    let request_id = request_id_of(&headers);

    let result = match raw.parse::<Destination>() {
        Ok(destination) => {
            tracing::debug!(request_id = %request_id, destination = %destination, "Relaying request");
            state.relay.forward(&destination, headers.get(X_REQUEST_ID)).await
        }
        Err(e) => Err(e.into()),
    };

    match &result {
        Ok(response) => {
            tracing::debug!(
                request_id = %request_id,
                destination = %raw,
                status = %response.status(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Relay complete"
            );
            metrics::record_relay("relayed", response.status().as_u16(), start_time);
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                destination = %raw,
                status = %e.status(),
                error = %e,
                "Relay failed"
            );
            metrics::record_relay(e.outcome(), e.status().as_u16(), start_time);
        }
    }

    result
}

/// `GET /proxy` and `GET /proxy/` name no destination at all.
pub async fn missing_destination() -> RelayError {
    tracing::warn!("Relay requested without a destination");
    RelayError::InvalidDestination(DestinationError::Empty)
}
