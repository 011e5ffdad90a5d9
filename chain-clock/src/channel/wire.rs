//! JSON-RPC 2.0 envelope and payload decoding for test-mode ledger nodes

use crate::error::{ClockError, ClockResult, Operation};
use crate::types::{Block, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSON_RPC_VERSION: &str = "2.0";

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u32,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> JsonRpcRequest<'a> {
    pub fn new(method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: JSON_RPC_VERSION,
            id: rand::random::<u32>(),
            method,
            params,
        }
    }
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Outcome of a single exchange once the envelope has been parsed
#[derive(Debug)]
pub enum RpcReply {
    /// `result` member, `Value::Null` when absent or null
    Result(Value),
    /// `error` member
    Error(JsonRpcError),
}

impl JsonRpcResponse {
    pub fn into_reply(self) -> RpcReply {
        match self.error {
            Some(error) => RpcReply::Error(error),
            None => RpcReply::Result(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Decode a JSON-RPC quantity: either a `0x`-prefixed hex string or a plain
/// non-negative JSON integer. Decimal strings are accepted too.
pub fn parse_quantity(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => {
            let s = s.trim();
            if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                if hex.is_empty() {
                    return None;
                }
                u64::from_str_radix(hex, 16).ok()
            } else {
                s.parse::<u64>().ok()
            }
        }
        _ => None,
    }
}

/// Decode a block header object as returned by `eth_getBlockByNumber`.
///
/// `null` decodes to `None`. Anything else must be an object carrying
/// `number` and `timestamp` quantities.
pub fn parse_block(value: &Value, operation: Operation) -> ClockResult<Option<Block>> {
    let object = match value {
        Value::Null => return Ok(None),
        Value::Object(object) => object,
        other => {
            return Err(ClockError::transport(
                operation,
                format!("expected block object, got {}", other),
            ))
        }
    };

    let field = |name: &str| -> ClockResult<u64> {
        let raw = object.get(name).ok_or_else(|| {
            ClockError::transport(operation, format!("block header missing '{}'", name))
        })?;
        parse_quantity(raw).ok_or_else(|| {
            ClockError::transport(
                operation,
                format!("block header field '{}' is not a quantity: {}", name, raw),
            )
        })
    };

    let number = field("number")?;
    let timestamp = field("timestamp")?;
    let mut block = Block::new(number, Timestamp::from_secs(timestamp));
    if let Some(hash) = object.get("hash").and_then(Value::as_str) {
        block = block.with_hash(hash);
    }

    Ok(Some(block))
}
