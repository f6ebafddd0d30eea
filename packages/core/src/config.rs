//! Application configuration: where the app lives and where its API lives.

use thiserror::Error;
use url::Url;

/// Errors raised while building an [`AppConfig`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required setting {0} is not set")]
    Missing(&'static str),

    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: String, reason: String },

    #[error("{name} must be an http(s) origin, got '{value}'")]
    NotAnOrigin { name: String, value: String },

    #[error("base path must be empty or start with '/', got '{0}'")]
    InvalidBasePath(String),
}

/// Default origin and base path of the explorer's backend API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Example: `https://explorer-api.example.com`.
    pub endpoint: Url,
    /// Prefix for every resource path, e.g. `""` or `/backend`.
    pub base_path: String,
}

/// Runtime configuration for the URL builder.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `LEDGERVIEW_BASE_URL` | required | The app's own origin; proxied requests go here |
/// | `LEDGERVIEW_API_ENDPOINT` | required | Default API origin |
/// | `LEDGERVIEW_API_BASE_PATH` | `""` | Default API base path |
/// | `LEDGERVIEW_USE_PROXY` | `false` | Always route through the app's proxy |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub base_url: Url,
    /// Force proxying regardless of where the app runs.
    pub use_proxy: bool,
    pub api: ApiConfig,
}

/// Parse `value` as an http(s) URL with a host.
pub fn parse_origin(name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::NotAnOrigin {
            name: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(url)
}

/// Validate a base path and strip any trailing `/`.
pub fn normalize_base_path(path: &str) -> Result<String, ConfigError> {
    let trimmed = path.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('/') {
        return Err(ConfigError::InvalidBasePath(path.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl AppConfig {
    /// Build from explicit values, validating each one.
    pub fn new(base_url: &str, api_endpoint: &str, api_base_path: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_origin("base_url", base_url)?,
            use_proxy: false,
            api: ApiConfig {
                endpoint: parse_origin("api.endpoint", api_endpoint)?,
                base_path: normalize_base_path(api_base_path)?,
            },
        })
    }

    /// Builder-style setter for [`AppConfig::use_proxy`].
    pub fn with_use_proxy(mut self, use_proxy: bool) -> Self {
        self.use_proxy = use_proxy;
        self
    }

    /// Populate config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`AppConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url =
            lookup("LEDGERVIEW_BASE_URL").ok_or(ConfigError::Missing("LEDGERVIEW_BASE_URL"))?;
        let endpoint = lookup("LEDGERVIEW_API_ENDPOINT")
            .ok_or(ConfigError::Missing("LEDGERVIEW_API_ENDPOINT"))?;
        let base_path = lookup("LEDGERVIEW_API_BASE_PATH").unwrap_or_default();
        let use_proxy = lookup("LEDGERVIEW_USE_PROXY")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self {
            base_url: parse_origin("LEDGERVIEW_BASE_URL", &base_url)?,
            use_proxy,
            api: ApiConfig {
                endpoint: parse_origin("LEDGERVIEW_API_ENDPOINT", &endpoint)?,
                base_path: normalize_base_path(&base_path)?,
            },
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn from_lookup_with_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("LEDGERVIEW_BASE_URL", "http://localhost:3000"),
            ("LEDGERVIEW_API_ENDPOINT", "https://api.example.com"),
        ]))
        .unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(cfg.api.endpoint.host_str(), Some("api.example.com"));
        assert_eq!(cfg.api.base_path, "");
        assert!(!cfg.use_proxy);
    }

    #[test]
    fn from_lookup_reads_everything() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("LEDGERVIEW_BASE_URL", "https://explorer.example.com"),
            ("LEDGERVIEW_API_ENDPOINT", "https://api.example.com"),
            ("LEDGERVIEW_API_BASE_PATH", "/backend/"),
            ("LEDGERVIEW_USE_PROXY", "TRUE"),
        ]))
        .unwrap();
        assert_eq!(cfg.api.base_path, "/backend");
        assert!(cfg.use_proxy);
    }

    #[test]
    fn missing_endpoint() {
        let err = AppConfig::from_lookup(lookup(&[(
            "LEDGERVIEW_BASE_URL",
            "https://explorer.example.com",
        )]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("LEDGERVIEW_API_ENDPOINT"));
    }

    #[test]
    fn invalid_url() {
        assert!(matches!(
            AppConfig::new("not a url", "https://api.example.com", ""),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn non_http_origin() {
        assert!(matches!(
            AppConfig::new("mailto:ops@example.com", "https://api.example.com", ""),
            Err(ConfigError::NotAnOrigin { .. })
        ));
    }

    #[test]
    fn base_path_must_be_absolute() {
        assert_eq!(
            normalize_base_path("api"),
            Err(ConfigError::InvalidBasePath("api".into()))
        );
        assert_eq!(normalize_base_path("").unwrap(), "");
        assert_eq!(normalize_base_path("/").unwrap(), "");
    }
}
