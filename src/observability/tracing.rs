//! Per-request spans.

use axum::{body::Body, http::Request};
use tracing::Span;

use crate::http::request::request_id_of;

/// Span for `TraceLayer`, tagged with the request ID so relay logs correlate.
pub fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id_of(request.headers()),
    )
}
