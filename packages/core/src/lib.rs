//! API addressing for the LedgerView blockchain explorer.
//!
//! The explorer's views fetch blocks, transactions, validators, and contract
//! metadata from a REST backend and a JSON-RPC node.  This crate turns a
//! symbolic resource name plus parameters into the absolute URL to call,
//! routing through the app's same-origin proxy when required.  It performs
//! **no I/O**; the host (the CLI, the WASM bindings, a server) makes the
//! HTTP calls.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`resources`] | The closed registry: [`ResourceName`] → [`ApiResource`] |
//! | [`route`] | [`Route`], one variant per resource with typed path parameters |
//! | [`template`] | `:name` route templates and [`PathParams`] |
//! | [`query`] | Ordered [`QueryParams`] and the omission rule |
//! | [`proxy`] | [`ProxyPolicy`] and the `/node-api/proxy` prefix |
//! | [`config`] | [`AppConfig`], from env or explicit values |
//! | [`builder`] | [`UrlBuilder`], which ties the above together |
//! | [`rpc`] | JSON-RPC bodies and block-reward decoding |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use ledgerview_api::{AppConfig, BlockId, QueryParams, QueryValue, Route, UrlBuilder};
//!
//! let config = AppConfig::from_env()?;
//! let builder = UrlBuilder::new(config);
//!
//! let url = builder.route(
//!     &Route::BlockTxs { id: BlockId::Height(1_234_567) },
//!     &QueryParams::new().with("next_page_params", QueryValue::Null),
//! )?;
//! // https://api.example.com/api/v2/blocks/1234567/transactions?next_page_params=null
//! ```

pub mod builder;
pub mod config;
pub mod proxy;
pub mod query;
pub mod resources;
pub mod route;
pub mod rpc;
pub mod template;

pub use builder::{UrlBuilder, UrlError};
pub use config::{ApiConfig, AppConfig, ConfigError};
pub use proxy::{ConfigProxyPolicy, FixedProxy, ProxyPolicy, PROXY_PREFIX};
pub use query::{InvalidQuery, QueryParams, QueryValue};
pub use resources::{ApiResource, Method, ResourceName, UnknownResource};
pub use route::{BlockId, Route};
pub use rpc::{block_reward, latest_block_request, RpcError, RpcRequest, RpcResponse, Wei};
pub use template::{PathParamError, PathParams, PathTemplate, PathValue};
