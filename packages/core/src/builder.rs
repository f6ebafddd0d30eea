//! The URL builder: resource name + path params + query params → absolute URL.
//!
//! # Resolution
//!
//! 1. Look up the [`ApiResource`] for the name.
//! 2. Ask the [`ProxyPolicy`] whether to proxy (every call, never cached).
//! 3. Origin: the app's `base_url` when proxying, else the resource's
//!    `endpoint`, else the API default.
//! 4. Base path: the resource's `base_path`, else the API default; prefixed
//!    with [`PROXY_PREFIX`] when proxying.
//! 5. Render `base_path + resource.path` with the path params.
//! 6. Resolve that path against the origin and append the query pairs.

use std::sync::Arc;

use thiserror::Error;
use url::Url;

use crate::config::{parse_origin, AppConfig, ConfigError};
use crate::proxy::{ConfigProxyPolicy, ProxyPolicy, PROXY_PREFIX};
use crate::query::{InvalidQuery, QueryParams};
use crate::resources::{ApiResource, ResourceName, UnknownResource};
use crate::route::Route;
use crate::template::{PathParamError, PathParams, PathTemplate};

/// Everything that can go wrong while building a URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error(transparent)]
    UnknownResource(#[from] UnknownResource),

    #[error("path parameter substitution failed: {0}")]
    PathParamSubstitution(#[from] PathParamError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("invalid query parameters: {0}")]
    InvalidQuery(#[from] InvalidQuery),

    #[error("cannot resolve '{path}' against '{origin}': {reason}")]
    Resolve {
        origin: String,
        path: String,
        reason: String,
    },
}

/// Builds absolute URLs for registry resources.
///
/// Cheap to clone and safe to share between threads; nothing is mutated
/// after construction.
#[derive(Clone)]
pub struct UrlBuilder {
    config: AppConfig,
    proxy: Arc<dyn ProxyPolicy>,
}

impl std::fmt::Debug for UrlBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UrlBuilder {
    /// A builder using [`ConfigProxyPolicy`] derived from `config`.
    pub fn new(config: AppConfig) -> Self {
        let proxy = Arc::new(ConfigProxyPolicy::from_config(&config));
        Self { config, proxy }
    }

    pub fn with_proxy_policy(config: AppConfig, proxy: Arc<dyn ProxyPolicy>) -> Self {
        Self { config, proxy }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Resolve a resource into a [`Url`].
    pub fn url(
        &self,
        name: ResourceName,
        path_params: &PathParams,
        query: &QueryParams,
    ) -> Result<Url, UrlError> {
        let resource = name.resource();
        let proxied = self.proxy.needs_proxy();

        let origin = self.origin(resource, proxied)?;
        let template = format!("{}{}", self.base_path(resource, proxied), resource.path);
        tracing::trace!(resource = %name, proxied, %origin, %template, "resolving api url");

        let path = PathTemplate::parse(&template)?.render(path_params)?;
        let mut url = origin.join(&path).map_err(|e| UrlError::Resolve {
            origin: origin.to_string(),
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let pairs = query.pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        tracing::debug!(resource = %name, proxied, url = %url, "built api url");
        Ok(url)
    }

    /// Resolve a resource into its canonical URL string.
    pub fn build(
        &self,
        name: ResourceName,
        path_params: &PathParams,
        query: &QueryParams,
    ) -> Result<String, UrlError> {
        self.url(name, path_params, query).map(String::from)
    }

    /// Like [`UrlBuilder::build`], with the resource given by name.
    pub fn build_named(
        &self,
        name: &str,
        path_params: &PathParams,
        query: &QueryParams,
    ) -> Result<String, UrlError> {
        let name: ResourceName = name.parse()?;
        self.build(name, path_params, query)
    }

    /// Resolve a typed [`Route`].
    pub fn route(&self, route: &Route<'_>, query: &QueryParams) -> Result<String, UrlError> {
        self.build(route.name(), &route.params(), query)
    }

    fn origin(&self, resource: &ApiResource, proxied: bool) -> Result<Url, UrlError> {
        if proxied {
            return Ok(self.config.base_url.clone());
        }
        match resource.endpoint {
            Some(endpoint) => Ok(parse_origin("resource endpoint", endpoint)?),
            None => Ok(self.config.api.endpoint.clone()),
        }
    }

    fn base_path(&self, resource: &ApiResource, proxied: bool) -> String {
        let base = match resource.base_path {
            Some(path) => path,
            None => self.config.api.base_path.as_str(),
        };
        if proxied {
            format!("{PROXY_PREFIX}{base}")
        } else {
            base.to_string()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::FixedProxy;
    use crate::query::QueryValue;
    use crate::route::BlockId;

    fn builder(proxied: bool) -> UrlBuilder {
        let cfg = AppConfig::new(
            "https://explorer.example.com",
            "https://api.example.com",
            "",
        )
        .unwrap();
        UrlBuilder::with_proxy_policy(cfg, Arc::new(FixedProxy(proxied)))
    }

    #[test]
    fn plain_resource() {
        let url = builder(false)
            .build(ResourceName::Blocks, &PathParams::new(), &QueryParams::new())
            .unwrap();
        assert_eq!(url, "https://api.example.com/api/v2/blocks");
    }

    #[test]
    fn typed_route() {
        let url = builder(false)
            .route(
                &Route::Block {
                    id: BlockId::Height(42),
                },
                &QueryParams::new(),
            )
            .unwrap();
        assert_eq!(url, "https://api.example.com/api/v2/blocks/42");
    }

    #[test]
    fn query_string() {
        let q = QueryParams::new()
            .with("type", "block")
            .with("next_page", QueryValue::Null)
            .with("skip", QueryValue::Undefined);
        let url = builder(false)
            .build(ResourceName::Blocks, &PathParams::new(), &q)
            .unwrap();
        assert_eq!(
            url,
            "https://api.example.com/api/v2/blocks?type=block&next_page=null"
        );
    }

    #[test]
    fn query_values_are_form_encoded() {
        let q = QueryParams::new().with("q", "a b&c");
        let url = builder(false)
            .build(ResourceName::Search, &PathParams::new(), &q)
            .unwrap();
        assert_eq!(url, "https://api.example.com/api/v2/search?q=a+b%26c");
    }

    #[test]
    fn proxied_resource() {
        let url = builder(true)
            .build(ResourceName::Blocks, &PathParams::new(), &QueryParams::new())
            .unwrap();
        assert_eq!(
            url,
            "https://explorer.example.com/node-api/proxy/api/v2/blocks"
        );
    }

    #[test]
    fn missing_path_param() {
        let err = builder(false)
            .build(ResourceName::Tx, &PathParams::new(), &QueryParams::new())
            .unwrap_err();
        assert!(matches!(
            err,
            UrlError::PathParamSubstitution(PathParamError::Missing { .. })
        ));
    }

    #[test]
    fn unknown_named_resource() {
        let err = builder(false)
            .build_named("nope", &PathParams::new(), &QueryParams::new())
            .unwrap_err();
        assert_eq!(err, UrlError::UnknownResource(UnknownResource("nope".into())));
    }

    #[test]
    fn resource_base_path_override() {
        let cfg = AppConfig::new(
            "https://explorer.example.com",
            "https://api.example.com",
            "/backend",
        )
        .unwrap();
        let b = UrlBuilder::with_proxy_policy(cfg, Arc::new(FixedProxy(false)));
        let blocks = b
            .build(ResourceName::Blocks, &PathParams::new(), &QueryParams::new())
            .unwrap();
        let health = b
            .build(ResourceName::Health, &PathParams::new(), &QueryParams::new())
            .unwrap();
        assert_eq!(blocks, "https://api.example.com/backend/api/v2/blocks");
        assert_eq!(health, "https://api.example.com/api/health");
    }
}
