//! WebAssembly bindings for the LedgerView API URL builder.
//!
//! The explorer's view layer runs in the browser (and on the server during
//! rendering).  These bindings give it the same resolution rules the native
//! crate uses.  Compile with `wasm-pack build` to produce an npm-ready package.
//!
//! ```js
//! import init, { ExplorerApi, listResources } from './ledgerview_wasm.js';
//! await init();
//!
//! const api = new ExplorerApi(JSON.stringify({
//!   baseUrl: 'https://explorer.example.com',
//!   apiEndpoint: 'https://api.example.com',
//!   apiBasePath: '',
//! }));
//!
//! // The host decides per call whether to proxy (server vs. browser render).
//! const url = api.buildUrl('block', '{"height_or_hash":"123"}', '{"next_page_params":null}', isNeedProxy());
//! ```

use std::sync::Arc;

use ledgerview_api::{
    AppConfig, FixedProxy, PathParams, PathValue, QueryParams, ResourceName, RpcResponse,
    UrlBuilder,
};
use serde_json::Value;
use wasm_bindgen::prelude::*;

/// One-time initialisation called at the start of every exported function.
///
/// Installs the `console_error_panic_hook` when the feature is enabled so
/// that Rust panics show up in the browser console as readable errors.
fn setup() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// URL builder bound to one app configuration.
#[wasm_bindgen]
pub struct ExplorerApi {
    config: AppConfig,
}

#[wasm_bindgen]
impl ExplorerApi {
    /// Create from a JSON configuration object:
    ///
    /// ```json
    /// {
    ///   "baseUrl":     "https://explorer.example.com",
    ///   "apiEndpoint": "https://api.example.com",
    ///   "apiBasePath": "",
    ///   "useProxy":    false
    /// }
    /// ```
    ///
    /// `apiBasePath` and `useProxy` are optional.  Throws on a missing or
    /// invalid URL.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<ExplorerApi, JsValue> {
        setup();
        let doc: Value = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("parse error: {e}")))?;
        let field = |name: &str| doc.get(name).and_then(Value::as_str).map(str::to_string);

        let config = AppConfig::from_lookup(|key| match key {
            "LEDGERVIEW_BASE_URL" => field("baseUrl"),
            "LEDGERVIEW_API_ENDPOINT" => field("apiEndpoint"),
            "LEDGERVIEW_API_BASE_PATH" => field("apiBasePath"),
            "LEDGERVIEW_USE_PROXY" => doc
                .get("useProxy")
                .and_then(Value::as_bool)
                .map(|b| b.to_string()),
            _ => None,
        })
        .map_err(js_err)?;

        Ok(Self { config })
    }

    /// Resolve `resource` to an absolute URL.
    ///
    /// `path_params` and `query` are JSON objects (or `undefined`).  Query
    /// keys keep their order; `null` and `false` values are sent, `""` is
    /// not, and arrays repeat the key.  `needs_proxy` is the host's answer
    /// for this call; leave it `undefined` to derive it from the config.
    #[wasm_bindgen(js_name = buildUrl)]
    pub fn build_url(
        &self,
        resource: &str,
        path_params: Option<String>,
        query: Option<String>,
        needs_proxy: Option<bool>,
    ) -> Result<String, JsValue> {
        setup();
        let name: ResourceName = resource.parse().map_err(js_err)?;
        let params = match path_params {
            Some(json) => parse_path_params(&json)?,
            None => PathParams::new(),
        };
        let query = match query {
            Some(json) => {
                let v: Value = serde_json::from_str(&json)
                    .map_err(|e| JsValue::from_str(&format!("parse error: {e}")))?;
                QueryParams::from_json(&v).map_err(js_err)?
            }
            None => QueryParams::new(),
        };

        let builder = match needs_proxy {
            Some(proxied) => {
                UrlBuilder::with_proxy_policy(self.config.clone(), Arc::new(FixedProxy(proxied)))
            }
            None => UrlBuilder::new(self.config.clone()),
        };
        builder.build(name, &params, &query).map_err(js_err)
    }
}

/// Every registered resource as a JSON array:
///
/// ```json
/// [{ "name": "block", "method": "GET", "path": "/api/v2/blocks/:height_or_hash",
///    "basePath": null, "endpoint": null }, …]
/// ```
#[wasm_bindgen(js_name = listResources)]
pub fn list_resources() -> String {
    setup();
    let items: Vec<Value> = ResourceName::ALL
        .iter()
        .map(|name| {
            let r = name.resource();
            serde_json::json!({
                "name":     name.as_str(),
                "method":   r.method.as_str(),
                "path":     r.path,
                "basePath": r.base_path,
                "endpoint": r.endpoint,
            })
        })
        .collect();
    Value::Array(items).to_string()
}

/// The JSON-RPC body asking the node for its latest block.
#[wasm_bindgen(js_name = latestBlockRequest)]
pub fn latest_block_request() -> String {
    setup();
    serde_json::to_string(&ledgerview_api::latest_block_request())
        .unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

/// Decode the block reward, in ether, from the node's raw response body.
///
/// Throws on a JSON-RPC error or a block without a `BlockReward` field.
#[wasm_bindgen(js_name = blockRewardEther)]
pub fn block_reward_ether(response_json: &str) -> Result<String, JsValue> {
    setup();
    let response: RpcResponse<Value> = serde_json::from_str(response_json)
        .map_err(|e| JsValue::from_str(&format!("parse error: {e}")))?;
    let block = response.into_result().map_err(js_err)?;
    let reward = ledgerview_api::block_reward(&block).map_err(js_err)?;
    Ok(reward.to_ether_string())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn parse_path_params(json: &str) -> Result<PathParams, JsValue> {
    let doc: Value =
        serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("parse error: {e}")))?;
    let map = match doc {
        Value::Object(map) => map,
        Value::Null => return Ok(PathParams::new()),
        other => {
            return Err(JsValue::from_str(&format!(
                "path parameters must be a JSON object, got {other}"
            )))
        }
    };

    let mut params = PathParams::new();
    for (name, v) in map {
        let value = match v {
            Value::String(s) => PathValue::Text(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PathValue::Number(i),
                None => PathValue::Text(n.to_string()),
            },
            Value::Array(items) => PathValue::List(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            other => {
                return Err(JsValue::from_str(&format!(
                    "path parameter '{name}' must be a string or number, got {other}"
                )))
            }
        };
        params.insert(name, value);
    }
    Ok(params)
}
