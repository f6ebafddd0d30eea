//! The static resource registry.
//!
//! Every API endpoint the explorer calls is a variant of [`ResourceName`].
//! The set is closed: typed callers cannot name a resource that does not
//! exist, and the only way to get [`UnknownResource`] is to parse a name from
//! a string (CLI arguments, the WASM bindings).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Origin of the chain's JSON-RPC node, used by the block-reward lookup.
pub const DEFAULT_RPC_ENDPOINT: &str = "https://devnet-taral-rpc1.tarality.com";

/// A resource name that is not in the registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown API resource: '{0}'")]
pub struct UnknownResource(pub String);

/// HTTP verb a resource is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static descriptor for one API resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiResource {
    /// Route template, e.g. `/api/v2/blocks/:height_or_hash`.
    pub path: &'static str,
    /// Overrides the API-wide base path.  `Some("")` means "no base path".
    pub base_path: Option<&'static str>,
    /// Overrides the API-wide origin.
    pub endpoint: Option<&'static str>,
    pub method: Method,
}

impl ApiResource {
    const fn get(path: &'static str) -> Self {
        Self {
            path,
            base_path: None,
            endpoint: None,
            method: Method::Get,
        }
    }
}

macro_rules! registry {
    ($( $(#[$doc:meta])* $variant:ident => $name:literal, $resource:expr; )*) => {
        /// Symbolic name of an API resource.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ResourceName {
            $( $(#[$doc])* $variant, )*
        }

        impl ResourceName {
            /// Every registered resource, in declaration order.
            pub const ALL: &'static [ResourceName] = &[ $( ResourceName::$variant, )* ];

            /// The snake_case name used by the stringly surfaces.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( ResourceName::$variant => $name, )*
                }
            }

            /// The static descriptor for this resource.
            pub fn resource(self) -> &'static ApiResource {
                match self {
                    $( ResourceName::$variant => {
                        const R: ApiResource = $resource;
                        &R
                    } )*
                }
            }
        }

        impl FromStr for ResourceName {
            type Err = UnknownResource;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $name => Ok(ResourceName::$variant), )*
                    other => Err(UnknownResource(other.to_string())),
                }
            }
        }
    };
}

registry! {
    /// Chain-wide counters shown on the home page.
    HomepageStats => "homepage_stats", ApiResource::get("/api/v2/stats");
    /// The short block list on the home page.
    HomepageBlocks => "homepage_blocks", ApiResource::get("/api/v2/main-page/blocks");
    Blocks => "blocks", ApiResource::get("/api/v2/blocks");
    Block => "block", ApiResource::get("/api/v2/blocks/:height_or_hash");
    BlockTxs => "block_txs", ApiResource::get("/api/v2/blocks/:height_or_hash/transactions");
    TxsValidated => "txs_validated", ApiResource::get("/api/v2/transactions");
    Tx => "tx", ApiResource::get("/api/v2/transactions/:hash");
    Validators => "validators", ApiResource::get("/api/v2/validators");
    Address => "address", ApiResource::get("/api/v2/addresses/:hash");
    AddressTxs => "address_txs", ApiResource::get("/api/v2/addresses/:hash/transactions");
    AddressTokens => "address_tokens", ApiResource::get("/api/v2/addresses/:hash/tokens/:kind?");
    Contract => "contract", ApiResource::get("/api/v2/smart-contracts/:hash");
    Search => "search", ApiResource::get("/api/v2/search");
    /// Liveness probe.  Always served from the server root.
    Health => "health", ApiResource {
        path: "/api/health",
        base_path: Some(""),
        endpoint: None,
        method: Method::Get,
    };
    /// The chain's JSON-RPC node.
    JsonRpc => "json_rpc", ApiResource {
        path: "/",
        base_path: Some(""),
        endpoint: Some(DEFAULT_RPC_ENDPOINT),
        method: Method::Post,
    };
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::PathTemplate;

    #[test]
    fn names_roundtrip() {
        for name in ResourceName::ALL {
            assert_eq!(name.as_str().parse::<ResourceName>(), Ok(*name));
        }
    }

    #[test]
    fn unknown_name() {
        assert_eq!(
            "no_such_thing".parse::<ResourceName>(),
            Err(UnknownResource("no_such_thing".into()))
        );
    }

    #[test]
    fn every_template_parses() {
        for name in ResourceName::ALL {
            PathTemplate::parse(name.resource().path)
                .unwrap_or_else(|e| panic!("{name}: {e}"));
        }
    }

    #[test]
    fn names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for name in ResourceName::ALL {
            assert!(seen.insert(name.as_str()), "duplicate name {name}");
        }
    }

    #[test]
    fn rpc_has_its_own_origin() {
        let r = ResourceName::JsonRpc.resource();
        assert_eq!(r.endpoint, Some(DEFAULT_RPC_ENDPOINT));
        assert_eq!(r.method, Method::Post);
    }
}
