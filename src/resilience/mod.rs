//! Resilience helpers.
//!
//! The fixtures never retry on their own; retries are a property of the
//! platform under test. Backoff is used by the sampling client while it
//! waits for a freshly pushed app to become routable.

pub mod backoff;
