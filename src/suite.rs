//! Acceptance suite configuration.
//!
//! One explicit value describing the platform under test, loaded from the
//! JSON file named by `CONFIG` and passed into whatever needs it.

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_ENV: &str = "CONFIG";
pub const DEFAULT_INTERNAL_APPS_DOMAIN: &str = "apps.internal";
pub const DEFAULT_INTERNAL_ISTIO_DOMAIN: &str = "istio.apps.internal";
pub const NAME_PREFIX: &str = "IATS";

const DEFAULT_PRODUCT_PAGE_IMAGE: &str = "istio/examples-bookinfo-productpage-v1:1.5.0";
const DEFAULT_REVIEWS_IMAGE: &str = "istio/examples-bookinfo-reviews-v3:1.5.0";
const DEFAULT_RATINGS_IMAGE: &str = "istio/examples-bookinfo-ratings-v1:1.5.0";
const DEFAULT_DETAILS_IMAGE: &str = "istio/examples-bookinfo-details-v1:1.5.0";

#[derive(Debug, Error)]
pub enum SuiteConfigError {
    #[error("CONFIG is not set")]
    Unset,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Missing required config properties: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SuiteConfig {
    #[serde(rename = "cf_system_domain")]
    pub system_domain: String,
    #[serde(rename = "cf_internal_apps_domain")]
    pub internal_apps_domain: String,
    #[serde(rename = "cf_internal_istio_domain")]
    pub internal_istio_domain: String,
    #[serde(rename = "cf_istio_domain")]
    pub istio_domain: String,
    #[serde(rename = "cf_admin_user")]
    pub admin_user: String,
    #[serde(rename = "cf_admin_password")]
    pub admin_password: String,
    pub include_internal_route_tests: bool,
    #[serde(rename = "product_page_docker_tag")]
    pub product_page_image: String,
    #[serde(rename = "reviews_docker_tag")]
    pub reviews_image: String,
    #[serde(rename = "ratings_docker_tag")]
    pub ratings_image: String,
    #[serde(rename = "details_docker_tag")]
    pub details_image: String,
}

impl std::fmt::Debug for SuiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteConfig")
            .field("system_domain", &self.system_domain)
            .field("internal_apps_domain", &self.internal_apps_domain)
            .field("internal_istio_domain", &self.internal_istio_domain)
            .field("istio_domain", &self.istio_domain)
            .field("admin_user", &self.admin_user)
            .field("admin_password", &"<redacted>")
            .field("include_internal_route_tests", &self.include_internal_route_tests)
            .finish_non_exhaustive()
    }
}

impl SuiteConfig {
    /// Load the file named by `CONFIG`.
    pub fn from_env() -> Result<Self, SuiteConfigError> {
        let path = std::env::var(CONFIG_ENV).map_err(|_| SuiteConfigError::Unset)?;
        Self::load(Path::new(&path))
    }

    /// Read, parse, validate, then fill in image defaults.
    pub fn load(path: &Path) -> Result<Self, SuiteConfigError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn parse(content: &str) -> Result<Self, SuiteConfigError> {
        let config: SuiteConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config.with_defaults())
    }

    /// Reports every missing required property at once.
    pub fn validate(&self) -> Result<(), SuiteConfigError> {
        let missing: Vec<&'static str> = [
            ("cf_istio_domain", &self.istio_domain),
            ("cf_system_domain", &self.system_domain),
            ("cf_admin_user", &self.admin_user),
            ("cf_admin_password", &self.admin_password),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| key)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SuiteConfigError::Missing(missing))
        }
    }

    pub fn with_defaults(mut self) -> Self {
        for (field, default) in [
            (&mut self.product_page_image, DEFAULT_PRODUCT_PAGE_IMAGE),
            (&mut self.reviews_image, DEFAULT_REVIEWS_IMAGE),
            (&mut self.ratings_image, DEFAULT_RATINGS_IMAGE),
            (&mut self.details_image, DEFAULT_DETAILS_IMAGE),
        ] {
            if field.is_empty() {
                *field = default.to_string();
            }
        }
        self
    }

    pub fn internal_apps_domain(&self) -> &str {
        non_empty_or(&self.internal_apps_domain, DEFAULT_INTERNAL_APPS_DOMAIN)
    }

    pub fn internal_istio_domain(&self) -> &str {
        non_empty_or(&self.internal_istio_domain, DEFAULT_INTERNAL_ISTIO_DOMAIN)
    }

    pub fn api_endpoint(&self) -> String {
        format!("api.{}", self.system_domain)
    }

    pub fn app_url(app: &str, domain: &str) -> String {
        format!("http://{}.{}", app, domain)
    }

    /// `app.<internal istio domain>:port`, the destination a proxy relays to.
    pub fn internal_route(&self, app: &str, port: u16) -> String {
        format!("{}.{}:{}", app, self.internal_istio_domain(), port)
    }

    /// URL that asks the proxy app on the system domain to relay to
    /// `destination`.
    pub fn proxy_url(&self, proxy_app: &str, destination: &str) -> String {
        format!(
            "{}/proxy/{}",
            Self::app_url(proxy_app, &self.system_domain),
            destination
        )
    }
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

/// `PREFIX-RESOURCE-xxxxxxxx`, unique enough for app and route names.
pub fn prefixed_name(prefix: &str, resource: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen();
    format!("{}-{}-{:08x}", prefix, resource, suffix)
}
