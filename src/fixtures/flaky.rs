//! Flaky backend.
//!
//! `GET /` counts requests; every `period`-th one succeeds with
//! `200 Success!`, every other one fails with `500 Failure!`. A client that
//! sees only successes is being retried for by something in between.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Router};

pub const DEFAULT_PERIOD: u64 = 3;

/// Per-process request counter deciding each response.
#[derive(Debug)]
pub struct FlakyCounter {
    count: AtomicU64,
    period: u64,
}

impl FlakyCounter {
    /// A `period` of 0 or 1 means every request succeeds.
    pub fn new(period: u64) -> Self {
        Self {
            count: AtomicU64::new(0),
            period: period.max(1),
        }
    }

    pub fn next_outcome(&self) -> (StatusCode, &'static str) {
        let n = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        if n % self.period == 0 {
            (StatusCode::OK, "Success!")
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "Failure!")
        }
    }

    pub fn served(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }
}

impl Default for FlakyCounter {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD)
    }
}

pub fn router(counter: Arc<FlakyCounter>) -> Router {
    Router::new().route("/", get(flaky)).with_state(counter)
}

async fn flaky(State(counter): State<Arc<FlakyCounter>>) -> (StatusCode, &'static str) {
    let (status, body) = counter.next_outcome();
    tracing::debug!(status = %status, served = counter.served(), "Flaky response");
    (status, body)
}
