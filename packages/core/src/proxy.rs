//! Whether a request must go through the app's same-origin proxy.
//!
//! The answer can change between calls (the same process may render on the
//! server and in the browser), so [`crate::UrlBuilder`] asks on every call.

use url::Url;

use crate::config::AppConfig;

/// Path prefix the app's proxy route is mounted at.
pub const PROXY_PREFIX: &str = "/node-api/proxy";

/// Decides, per call, whether to route through the proxy.
pub trait ProxyPolicy: Send + Sync {
    fn needs_proxy(&self) -> bool;
}

impl<F> ProxyPolicy for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn needs_proxy(&self) -> bool {
        self()
    }
}

/// Always the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedProxy(pub bool);

impl ProxyPolicy for FixedProxy {
    fn needs_proxy(&self) -> bool {
        self.0
    }
}

/// The default policy, derived from [`AppConfig`].
///
/// Proxies when `use_proxy` is set, or when the app is served from
/// `localhost` and the API lives on some other host: a local dev server
/// cannot call the API cross-origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigProxyPolicy {
    use_proxy: bool,
    app_host: Option<String>,
    api_host: Option<String>,
}

fn host(url: &Url) -> Option<String> {
    url.host_str().map(str::to_ascii_lowercase)
}

impl ConfigProxyPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            use_proxy: config.use_proxy,
            app_host: host(&config.base_url),
            api_host: host(&config.api.endpoint),
        }
    }
}

impl ProxyPolicy for ConfigProxyPolicy {
    fn needs_proxy(&self) -> bool {
        if self.use_proxy {
            return true;
        }
        self.app_host.as_deref() == Some("localhost") && self.app_host != self.api_host
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
