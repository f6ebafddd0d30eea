//! `ledgerview` — command-line access to the LedgerView explorer API.
//!
//! Four subcommands:
//!
//! - **`resources`** — list every registered API resource.
//! - **`url`** — resolve a resource and its parameters to an absolute URL.
//! - **`get`** — resolve a resource, `GET` it, and pretty-print the JSON body.
//! - **`reward`** — ask the chain's JSON-RPC node for the latest block reward.
//!
//! Configuration comes from flags or the matching `LEDGERVIEW_*` environment
//! variables.  Logs go to stderr (`RUST_LOG=ledgerview_api=debug` shows each
//! resolved URL), so stdout stays pipeable.

use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use ledgerview_api::{
    block_reward, latest_block_request, AppConfig, ConfigError, FixedProxy, Method, PathParams,
    QueryParams, QueryValue, ResourceName, RpcResponse, UrlBuilder,
};
use serde_json::Value;

/// ledgerview — LedgerView explorer API CLI
///
/// Resolve and fetch explorer API resources.
#[derive(Parser)]
#[command(name = "ledgerview", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every registered API resource with its method and route template.
    Resources,

    /// Print the absolute URL for a resource.
    ///
    /// Examples:
    ///   ledgerview url block -p height_or_hash=1234567
    ///   ledgerview url blocks -q type=block --null next_page_params
    Url(RequestArgs),

    /// Resolve a resource, GET it, and print the JSON response.
    Get(RequestArgs),

    /// Fetch the latest block from the JSON-RPC node and print its reward in ether.
    Reward(ConfigArgs),
}

#[derive(Args)]
struct RequestArgs {
    /// Resource name, e.g. `block` or `homepage_stats`.  See `ledgerview resources`.
    resource: String,

    /// A path parameter: NAME=VALUE.  Repeat for each placeholder.
    #[arg(short = 'p', long = "param", value_name = "NAME=VALUE")]
    params: Vec<String>,

    /// A query parameter: KEY=VALUE.  Repeat a key to send it more than once;
    /// `KEY=` (empty value) leaves the key out.
    #[arg(short = 'q', long = "query", value_name = "KEY=VALUE")]
    query: Vec<String>,

    /// A query key sent with the value `null`, after the `--query` pairs.
    #[arg(long = "null", value_name = "KEY")]
    nulls: Vec<String>,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args)]
struct ConfigArgs {
    /// The app's own origin; proxied requests are sent here.
    #[arg(long, env = "LEDGERVIEW_BASE_URL", value_name = "URL")]
    base_url: Option<String>,

    /// Default API origin.
    #[arg(long, env = "LEDGERVIEW_API_ENDPOINT", value_name = "URL")]
    api_endpoint: Option<String>,

    /// Default API base path, e.g. `/backend`.
    #[arg(long, env = "LEDGERVIEW_API_BASE_PATH", value_name = "PATH")]
    api_base_path: Option<String>,

    /// Route through the app's `/node-api/proxy` regardless of configuration.
    #[arg(long, conflicts_with = "direct")]
    proxy: bool,

    /// Call the API origin directly regardless of configuration.
    #[arg(long)]
    direct: bool,
}

impl ConfigArgs {
    fn app_config(&self) -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|key| match key {
            "LEDGERVIEW_BASE_URL" => self.base_url.clone(),
            "LEDGERVIEW_API_ENDPOINT" => self.api_endpoint.clone(),
            "LEDGERVIEW_API_BASE_PATH" => self.api_base_path.clone(),
            other => std::env::var(other).ok(),
        })
    }

    fn builder(&self) -> UrlBuilder {
        let config = self
            .app_config()
            .unwrap_or_else(|e| fatal(&format!("configuration error: {e}")));
        match (self.proxy, self.direct) {
            (true, _) => UrlBuilder::with_proxy_policy(config, Arc::new(FixedProxy(true))),
            (_, true) => UrlBuilder::with_proxy_policy(config, Arc::new(FixedProxy(false))),
            _ => UrlBuilder::new(config),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledgerview=info,ledgerview_api=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Resources => {
            for name in ResourceName::ALL {
                let r = name.resource();
                let mut line = format!("{:<16} {:<6} {}", name.as_str(), r.method.as_str(), r.path);
                if let Some(endpoint) = r.endpoint {
                    line.push_str(&format!("  (origin {endpoint})"));
                }
                if let Some(base_path) = r.base_path {
                    line.push_str(&format!("  (base path '{base_path}')"));
                }
                println!("{line}");
            }
        }

        Command::Url(args) => {
            let (_, url) = resolve(&args);
            println!("{url}");
        }

        Command::Get(args) => {
            let (name, url) = resolve(&args);
            if name.resource().method != Method::Get {
                fatal(&format!(
                    "{name} is called with {}, not GET",
                    name.resource().method
                ));
            }
            tracing::info!("GET {url}");
            let body: Value = http_client()
                .get(&url)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.json())
                .unwrap_or_else(|e| fatal(&format!("request to {url} failed: {e}")));
            println!("{}", pretty(&body));
        }

        Command::Reward(config) => {
            let url = config
                .builder()
                .build(ResourceName::JsonRpc, &PathParams::new(), &QueryParams::new())
                .unwrap_or_else(|e| fatal(&e.to_string()));
            tracing::info!("POST {url} eth_getBlockByNumber");
            let response: RpcResponse<Value> = http_client()
                .post(&url)
                .json(&latest_block_request())
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.json())
                .unwrap_or_else(|e| fatal(&format!("request to {url} failed: {e}")));
            let reward = response
                .into_result()
                .and_then(|block| block_reward(&block))
                .unwrap_or_else(|e| fatal(&e.to_string()));
            println!("{}", reward.to_ether_string());
        }
    }
}

/// Parse the resource name and parameters, then build the URL.
fn resolve(args: &RequestArgs) -> (ResourceName, String) {
    let name: ResourceName = args
        .resource
        .parse()
        .unwrap_or_else(|e| fatal(&format!("{e} (see `ledgerview resources`)")));

    let mut params = PathParams::new();
    for raw in &args.params {
        let (k, v) = split_pair("--param", raw);
        params.insert(k, v);
    }

    let url = args
        .config
        .builder()
        .build(name, &params, &query_params(args))
        .unwrap_or_else(|e| fatal(&e.to_string()));
    (name, url)
}

fn query_params(args: &RequestArgs) -> QueryParams {
    let mut query = QueryParams::new();
    for raw in &args.query {
        let (k, v) = split_pair("--query", raw);
        query.push(k, v);
    }
    for key in &args.nulls {
        query.push(key.as_str(), QueryValue::Null);
    }
    query
}

/// Split `NAME=VALUE`; exits on a missing `=`.
fn split_pair<'a>(flag: &str, raw: &'a str) -> (&'a str, &'a str) {
    raw.split_once('=').unwrap_or_else(|| {
        fatal(&format!(
            "invalid {flag} {raw:?}: expected format NAME=VALUE"
        ))
    })
}

fn http_client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|e| fatal(&format!("failed to build HTTP client: {e}")))
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("ledgerview: {}", msg);
    process::exit(2);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_args(argv: &[&str]) -> RequestArgs {
        match Cli::try_parse_from(argv.iter().copied()).unwrap().command {
            Command::Url(args) | Command::Get(args) => args,
            _ => panic!("expected a request subcommand"),
        }
    }

    #[test]
    fn null_flag_sends_null() {
        let args = request_args(&[
            "ledgerview", "url", "blocks", "-q", "type=block", "--null", "cursor", "--direct",
        ]);
        assert_eq!(args.nulls, ["cursor"]);
        assert_eq!(
            query_params(&args).pairs(),
            [
                ("type".to_string(), "block".to_string()),
                ("cursor".to_string(), "null".to_string()),
            ]
        );
    }

    #[test]
    fn null_flag_builds_url() {
        let args = request_args(&[
            "ledgerview",
            "url",
            "blocks",
            "--null",
            "next_page_params",
            "--base-url",
            "https://explorer.example.com",
            "--api-endpoint",
            "https://api.example.com",
            "--api-base-path=",
            "--direct",
        ]);
        let (name, url) = resolve(&args);
        assert_eq!(name, ResourceName::Blocks);
        assert_eq!(
            url,
            "https://api.example.com/api/v2/blocks?next_page_params=null"
        );
    }
}
