//! JSON-RPC payloads for the chain node, and block-reward decoding.
//!
//! The node is the [`ResourceName::JsonRpc`](crate::ResourceName::JsonRpc)
//! resource; build its URL with the [`UrlBuilder`](crate::UrlBuilder) and
//! `POST` the body from [`latest_block_request`].  The host does the I/O.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RpcError {
    #[error("node returned error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("response has neither 'result' nor 'error'")]
    MissingResult,

    #[error("block is missing the '{0}' field")]
    MissingField(&'static str),

    #[error("invalid quantity: '{0}'")]
    InvalidQuantity(String),
}

/// A JSON-RPC 2.0 request body.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RpcRequest {
    pub id: u64,
    pub jsonrpc: &'static str,
    pub method: String,
    pub params: Vec<Value>,
}

impl RpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            id,
            jsonrpc: "2.0",
            method: method.into(),
            params,
        }
    }
}

/// `eth_getBlockByNumber("latest")`.
pub fn latest_block_request() -> RpcRequest {
    RpcRequest::new(1, "eth_getBlockByNumber", vec![Value::from("latest")])
}

/// The `error` member of a failed JSON-RPC response.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// A JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RpcResponse<T> {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub jsonrpc: String,
    pub result: Option<T>,
    pub error: Option<RpcErrorObject>,
}

impl<T> RpcResponse<T> {
    pub fn into_result(self) -> Result<T, RpcError> {
        if let Some(e) = self.error {
            return Err(RpcError::Remote {
                code: e.code,
                message: e.message,
            });
        }
        self.result.ok_or(RpcError::MissingResult)
    }
}

/// An amount in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Wei(pub u128);

impl Wei {
    /// Parse a `0x`-prefixed hex quantity or a decimal string.
    pub fn parse(s: &str) -> Result<Self, RpcError> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some("") => Ok(0),
            Some(hex) => u128::from_str_radix(hex, 16),
            None => s.parse::<u128>(),
        };
        parsed
            .map(Wei)
            .map_err(|_| RpcError::InvalidQuantity(s.to_string()))
    }

    /// Decimal ether with trailing zeros trimmed, e.g. `1.5`.
    pub fn to_ether_string(self) -> String {
        let whole = self.0 / WEI_PER_ETHER;
        let frac = self.0 % WEI_PER_ETHER;
        if frac == 0 {
            return whole.to_string();
        }
        let digits = format!("{frac:018}");
        format!("{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

/// Read the `BlockReward` field of an `eth_getBlockByNumber` result.
pub fn block_reward(block: &Value) -> Result<Wei, RpcError> {
    match block.get("BlockReward") {
        Some(Value::String(s)) => Wei::parse(s),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|n| Wei(n.into()))
            .ok_or_else(|| RpcError::InvalidQuantity(n.to_string())),
        Some(Value::Null) | None => Err(RpcError::MissingField("BlockReward")),
        Some(other) => Err(RpcError::InvalidQuantity(other.to_string())),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn latest_block_body() {
        let body = serde_json::to_value(latest_block_request()).unwrap();
        assert_eq!(
            body,
            json!({
                "id": 1,
                "jsonrpc": "2.0",
                "method": "eth_getBlockByNumber",
                "params": ["latest"],
            })
        );
    }

    #[test]
    fn reward_from_hex() {
        let block = json!({ "number": "0x10", "BlockReward": "0xde0b6b3a7640000" });
        let reward = block_reward(&block).unwrap();
        assert_eq!(reward, Wei(1_000_000_000_000_000_000));
        assert_eq!(reward.to_ether_string(), "1");
    }

    #[test]
    fn reward_fraction() {
        assert_eq!(Wei(1_500_000_000_000_000_000).to_ether_string(), "1.5");
        assert_eq!(Wei(1).to_ether_string(), "0.000000000000000001");
        assert_eq!(Wei(0).to_ether_string(), "0");
    }

    #[test]
    fn reward_from_decimal_and_number() {
        assert_eq!(
            block_reward(&json!({ "BlockReward": "2000" })).unwrap(),
            Wei(2000)
        );
        assert_eq!(block_reward(&json!({ "BlockReward": 7 })).unwrap(), Wei(7));
    }

    #[test]
    fn reward_missing() {
        assert_eq!(
            block_reward(&json!({ "number": "0x1" })),
            Err(RpcError::MissingField("BlockReward"))
        );
    }

    #[test]
    fn reward_garbage() {
        assert!(matches!(
            block_reward(&json!({ "BlockReward": "0xzz" })),
            Err(RpcError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn envelope_result() {
        let r: RpcResponse<Value> =
            serde_json::from_str(r#"{"id":1,"jsonrpc":"2.0","result":{"BlockReward":"0x1"}}"#)
                .unwrap();
        assert_eq!(r.into_result().unwrap()["BlockReward"], "0x1");
    }

    #[test]
    fn envelope_error() {
        let r: RpcResponse<Value> = serde_json::from_str(
            r#"{"id":1,"jsonrpc":"2.0","error":{"code":-32601,"message":"method not found"}}"#,
        )
        .unwrap();
        assert_eq!(
            r.into_result(),
            Err(RpcError::Remote {
                code: -32601,
                message: "method not found".into()
            })
        );
    }
}
