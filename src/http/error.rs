//! Relay failures and their HTTP status codes.
//!
//! Every failure is resolved into a response for the caller; nothing here is
//! fatal to the server.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::destination::DestinationError;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The path did not name a usable `host:port`.
    #[error(transparent)]
    InvalidDestination(#[from] DestinationError),

    /// Connection refused, DNS failure, or the upstream broke the protocol.
    #[error("destination {destination} unreachable: {source}")]
    Unreachable {
        destination: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    /// Response head arrived but the body could not be read.
    #[error("failed reading response body from {destination}: {reason}")]
    Body { destination: String, reason: String },

    #[error("destination {destination} did not answer within {after:?}")]
    Timeout { destination: String, after: Duration },
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidDestination(_) => StatusCode::BAD_REQUEST,
            RelayError::Unreachable { .. } | RelayError::Body { .. } => StatusCode::BAD_GATEWAY,
            RelayError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Metric label.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayError::InvalidDestination(_) => "invalid_destination",
            RelayError::Unreachable { .. } => "unreachable",
            RelayError::Body { .. } => "body_error",
            RelayError::Timeout { .. } => "timeout",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
