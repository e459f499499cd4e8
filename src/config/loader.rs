//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::FixtureConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable the platform sets to the port an app must listen on.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid PORT value {0:?}")]
    Port(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<FixtureConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => FixtureConfig::default(),
    };

    apply_port_override(&mut config, std::env::var(PORT_ENV).ok().as_deref())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Deserialize a config document without touching the environment.
pub fn parse_config(content: &str) -> Result<FixtureConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Rebind to `0.0.0.0:$PORT` when the platform assigns a port.
pub fn apply_port_override(config: &mut FixtureConfig, port: Option<&str>) -> Result<(), ConfigError> {
    let Some(raw) = port.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(());
    };

    let port: u16 = raw.parse().map_err(|_| ConfigError::Port(raw.to_string()))?;
    config.listener.bind_address = format!("0.0.0.0:{}", port);
    tracing::debug!(port, "Listener port taken from environment");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timeouts.upstream_secs, 5);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = parse_config(
            r#"
            [timeouts]
            upstream_secs = 3

            [observability]
            json_logs = true
            "#,
        )
        .unwrap();

        assert_eq!(config.timeouts.upstream_secs, 3);
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(config.observability.json_logs);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = parse_config("[listener\nbind_address = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn port_override_rebinds_listener() {
        let mut config = FixtureConfig::default();
        apply_port_override(&mut config, Some("61001")).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:61001");
    }

    #[test]
    fn blank_port_is_ignored() {
        let mut config = FixtureConfig::default();
        apply_port_override(&mut config, Some("  ")).unwrap();
        apply_port_override(&mut config, None).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let mut config = FixtureConfig::default();
        let err = apply_port_override(&mut config, Some("eighty")).unwrap_err();
        assert!(matches!(err, ConfigError::Port(ref p) if p == "eighty"));
    }
}
