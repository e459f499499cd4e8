//! HTTP client for driving fixtures from tests and the CLI.
//!
//! Mirrors what the acceptance suite does against a route: read a status,
//! poll until a freshly pushed app answers, and sample a route to build a
//! [`Distribution`].

use std::time::{Duration, Instant};

use futures_util::stream::{self, StreamExt};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::resilience::backoff::Backoff;
use crate::sampling::{sample_key, Distribution};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{url} did not return {expected} within {patience:?} ({attempts} attempts, last: {last})")]
    Patience {
        url: String,
        expected: StatusCode,
        patience: Duration,
        attempts: u32,
        last: String,
    },
}

pub struct FixtureClient {
    client: Client,
}

impl FixtureClient {
    /// A client with a per-request timeout and no idle connection reuse, so
    /// consecutive samples each take a fresh trip through the router.
    pub fn new(request_timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .pool_max_idle_per_host(0)
            .no_proxy()
            .build()?;
        Ok(Self { client })
    }

    pub async fn status_of(&self, url: &str) -> Result<StatusCode, ClientError> {
        Ok(self.client.get(url).send().await?.status())
    }

    pub async fn body_of(&self, url: &str) -> Result<(StatusCode, String), ClientError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        Ok((status, response.text().await?))
    }

    /// Poll `url` until it answers `expected`. Returns the attempt count.
    pub async fn wait_until_status(
        &self,
        url: &str,
        expected: StatusCode,
        patience: Duration,
        mut backoff: Backoff,
    ) -> Result<u32, ClientError> {
        // A patience too large to represent means no deadline at all.
        let deadline = Instant::now().checked_add(patience);

        loop {
            let last = match self.status_of(url).await {
                Ok(status) if status == expected => {
                    tracing::debug!(url, attempts = backoff.attempts() + 1, "Route answered");
                    return Ok(backoff.attempts() + 1);
                }
                Ok(status) => format!("status {}", status),
                Err(e) => format!("error: {}", e),
            };

            let mut delay = backoff.next_delay();
            if let Some(deadline) = deadline {
                let now = Instant::now();
                if now >= deadline {
                    return Err(ClientError::Patience {
                        url: url.to_string(),
                        expected,
                        patience,
                        attempts: backoff.attempts(),
                        last,
                    });
                }
                delay = delay.min(deadline - now);
            }

            tracing::trace!(url, last = %last, delay = ?delay, "Route not ready");
            tokio::time::sleep(delay).await;
        }
    }

    /// Issue `count` GETs, at most `concurrency` in flight, and tally them.
    pub async fn sample(
        &self,
        url: &str,
        count: usize,
        concurrency: usize,
        key_field: Option<&str>,
    ) -> Distribution {
        let results: Vec<_> = stream::iter(0..count)
            .map(|_| self.body_of(url))
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        let mut distribution = Distribution::new();
        for result in results {
            match result {
                Ok((status, body)) => distribution.record(status.as_u16(), sample_key(&body, key_field)),
                Err(e) => {
                    tracing::debug!(url, error = %e, "Sample failed");
                    distribution.record_error();
                }
            }
        }
        distribution
    }
}
