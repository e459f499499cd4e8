//! Routing Test Fixtures Library
//!
//! Small HTTP programs that get pushed as apps onto the platform under test so
//! the acceptance suite can observe routing, weighting and retry behaviour
//! from the outside.

pub mod client;
pub mod config;
pub mod fixtures;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod sampling;
pub mod suite;

pub use client::FixtureClient;
pub use config::FixtureConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use sampling::Distribution;
pub use suite::SuiteConfig;
