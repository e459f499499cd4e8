//! Relay destination parsing.
//!
//! A destination is the single path segment after `/proxy/`, written as
//! `host:port`. Parsing is strict: one segment, one colon, a numeric non-zero
//! port, and a host that is a valid domain name or IPv4 literal. Anything else
//! is rejected rather than guessed at.

use std::fmt;
use std::str::FromStr;

use axum::http::Uri;
use thiserror::Error;
use url::Host;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DestinationError {
    #[error("no destination given, expected /proxy/<host:port>")]
    Empty,

    #[error("destination {0:?} spans more than one path segment")]
    Nested(String),

    #[error("destination {0:?} has no port")]
    MissingPort(String),

    #[error("destination {0:?} has more than one ':'")]
    TooManyColons(String),

    #[error("destination {0:?} has no host")]
    EmptyHost(String),

    #[error("port {0:?} is not a number between 1 and 65535")]
    InvalidPort(String),

    #[error("host {host:?} is invalid: {reason}")]
    InvalidHost { host: String, reason: String },
}

/// A parsed `host:port` relay target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    host: String,
    port: u16,
}

impl Destination {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `http://host:port/`, the only URI the relay ever calls.
    pub fn root_uri(&self) -> Result<Uri, DestinationError> {
        format!("http://{}/", self)
            .parse()
            .map_err(|e: axum::http::uri::InvalidUri| DestinationError::InvalidHost {
                host: self.host.clone(),
                reason: e.to_string(),
            })
    }
}

impl FromStr for Destination {
    type Err = DestinationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() {
            return Err(DestinationError::Empty);
        }
        if raw.contains('/') {
            return Err(DestinationError::Nested(raw.to_string()));
        }

        let (host, port) = match raw.matches(':').count() {
            0 => return Err(DestinationError::MissingPort(raw.to_string())),
            1 => raw.split_once(':').unwrap_or((raw, "")),
            _ => return Err(DestinationError::TooManyColons(raw.to_string())),
        };

        if host.is_empty() {
            return Err(DestinationError::EmptyHost(raw.to_string()));
        }
        if port.is_empty() {
            return Err(DestinationError::MissingPort(raw.to_string()));
        }

        let port = match port.parse::<u16>() {
            Ok(0) | Err(_) => return Err(DestinationError::InvalidPort(port.to_string())),
            Ok(p) => p,
        };

        let host = match Host::parse(host) {
            Ok(Host::Domain(domain)) => domain,
            Ok(Host::Ipv4(ip)) => ip.to_string(),
            // Unreachable behind the colon check, kept for exhaustiveness.
            Ok(Host::Ipv6(_)) => {
                return Err(DestinationError::TooManyColons(raw.to_string()));
            }
            Err(e) => {
                return Err(DestinationError::InvalidHost {
                    host: host.to_string(),
                    reason: e.to_string(),
                })
            }
        };

        let destination = Self { host, port };
        destination.root_uri()?;
        Ok(destination)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_internal_route() {
        let d: Destination = "flaky-backend.istio.apps.internal:8080".parse().unwrap();
        assert_eq!(d.host(), "flaky-backend.istio.apps.internal");
        assert_eq!(d.port(), 8080);
        assert_eq!(d.to_string(), "flaky-backend.istio.apps.internal:8080");
        assert_eq!(
            d.root_uri().unwrap(),
            "http://flaky-backend.istio.apps.internal:8080/"
        );
    }

    #[test]
    fn parses_ipv4_literal() {
        let d: Destination = "10.255.0.7:61001".parse().unwrap();
        assert_eq!(d.host(), "10.255.0.7");
        assert_eq!(d.port(), 61001);
    }

    #[test]
    fn host_is_normalised_to_lowercase() {
        let d: Destination = "Backend.Apps.Internal:80".parse().unwrap();
        assert_eq!(d.host(), "backend.apps.internal");
    }

    #[test]
    fn rejects_missing_port() {
        assert_eq!(
            "not-a-valid-destination".parse::<Destination>(),
            Err(DestinationError::MissingPort("not-a-valid-destination".into()))
        );
        assert_eq!(
            "backend:".parse::<Destination>(),
            Err(DestinationError::MissingPort("backend:".into()))
        );
    }

    #[test]
    fn rejects_bad_ports() {
        for port in ["0", "65536", "http", "-1", "80 "] {
            let raw = format!("backend:{}", port);
            assert_eq!(
                raw.parse::<Destination>(),
                Err(DestinationError::InvalidPort(port.into())),
                "{raw}"
            );
        }
    }

    #[test]
    fn rejects_shape_problems() {
        assert_eq!("".parse::<Destination>(), Err(DestinationError::Empty));
        assert_eq!(
            ":8080".parse::<Destination>(),
            Err(DestinationError::EmptyHost(":8080".into()))
        );
        assert!(matches!(
            "a:1:2".parse::<Destination>(),
            Err(DestinationError::TooManyColons(_))
        ));
        assert!(matches!(
            "[::1]:8080".parse::<Destination>(),
            Err(DestinationError::TooManyColons(_))
        ));
        assert!(matches!(
            "a:80/proxy/b:80".parse::<Destination>(),
            Err(DestinationError::Nested(_))
        ));
    }

    #[test]
    fn rejects_invalid_host_characters() {
        assert!(matches!(
            "bad host:80".parse::<Destination>(),
            Err(DestinationError::InvalidHost { .. })
        ));
        assert!(matches!(
            "user@host:80".parse::<Destination>(),
            Err(DestinationError::InvalidHost { .. })
        ));
    }
}
