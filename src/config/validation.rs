//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that the relay budget fits inside the request budget
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FixtureConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::FixtureConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is not a valid socket address: {value:?}")]
    BadAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("timeouts.upstream_secs ({upstream}) exceeds timeouts.request_secs ({request})")]
    UpstreamExceedsRequest { upstream: u64, request: u64 },
}

pub fn validate_config(config: &FixtureConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("timeouts.connect_secs", timeouts.connect_secs),
        ("timeouts.upstream_secs", timeouts.upstream_secs),
        ("timeouts.request_secs", timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }
    if timeouts.upstream_secs > timeouts.request_secs {
        errors.push(ValidationError::UpstreamExceedsRequest {
            upstream: timeouts.upstream_secs,
            request: timeouts.request_secs,
        });
    }

    if config.relay.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("relay.max_body_bytes"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::BadAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
