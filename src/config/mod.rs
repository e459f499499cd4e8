//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (PORT from the platform)
//!     → validation.rs (semantic checks)
//!     → FixtureConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; the fixture runs with no config file at all
//! - Validation separates syntactic (serde) from semantic checks
//! - Suite-level settings (domains, credentials) live in `crate::suite`, not here

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::FixtureConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::RelayConfig;
pub use schema::TimeoutConfig;
