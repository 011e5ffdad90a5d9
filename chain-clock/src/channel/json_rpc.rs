//! HTTP JSON-RPC transport to a test-mode ledger node
//!
//! Talks the ganache/hardhat control vocabulary by default. Method names are
//! taken from [`ChannelConfig`] so other test nodes can be targeted.

use super::wire::{parse_block, parse_quantity, JsonRpcRequest, JsonRpcResponse, RpcReply};
use super::RequestChannel;
use crate::config::ChannelConfig;
use crate::error::{ClockError, ClockResult, ConfigError, Operation};
use crate::types::{Block, ShiftAck, TimeShift};
use async_trait::async_trait;
use log::{debug, trace, warn};
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

/// Request channel backed by a node's HTTP JSON-RPC endpoint
pub struct JsonRpcChannel {
    client: Client,
    url: Url,
    config: ChannelConfig,
}

impl JsonRpcChannel {
    /// Create a channel with default configuration
    pub fn new(endpoint: &str) -> Result<Self, ConfigError> {
        Self::with_config(ChannelConfig::new(endpoint))
    }

    /// Create a channel with custom configuration
    pub fn with_config(config: ChannelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let url = config.endpoint_url()?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connection_timeout())
            .build()
            .map_err(|e| ConfigError::InvalidEndpoint {
                endpoint: config.endpoint.clone(),
                reason: format!("cannot build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            url,
            config,
        })
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Perform one JSON-RPC exchange. Never retried.
    async fn call(&self, operation: Operation, method: &str, params: Value) -> ClockResult<RpcReply> {
        let request = JsonRpcRequest::new(method, params);
        debug!("JSON-RPC {} -> {} (id {})", method, self.url, request.id);

        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("request timeout after {:?}", self.config.request_timeout())
                } else if e.is_connect() {
                    format!("connection failed: {}", e)
                } else {
                    format!("network error: {}", e)
                };
                ClockError::transport(operation, reason)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClockError::transport(
                operation,
                format!(
                    "HTTP error {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown error")
                ),
            ));
        }

        let rpc_response: JsonRpcResponse = response.json().await.map_err(|e| {
            ClockError::transport(operation, format!("failed to parse JSON response: {}", e))
        })?;

        let reply = rpc_response.into_reply();
        trace!("JSON-RPC {} <- {:?}", method, reply);
        Ok(reply)
    }

    /// Exchange where a JSON-RPC error is a transport failure
    async fn call_result(&self, operation: Operation, method: &str, params: Value) -> ClockResult<Value> {
        match self.call(operation, method, params).await? {
            RpcReply::Result(value) => Ok(value),
            RpcReply::Error(error) => Err(ClockError::transport(
                operation,
                format!("RPC error {}: {}", error.code, error.message),
            )),
        }
    }

    async fn fetch_latest(&self, operation: Operation) -> ClockResult<Option<Block>> {
        let result = self
            .call_result(
                operation,
                &self.config.latest_block_method,
                json!(["latest", false]),
            )
            .await?;
        parse_block(&result, operation)
    }
}

#[async_trait]
impl RequestChannel for JsonRpcChannel {
    async fn get_latest_block(&self) -> ClockResult<Option<Block>> {
        self.fetch_latest(Operation::GetLatestBlock).await
    }

    async fn shift_time(&self, shift: TimeShift) -> ClockResult<ShiftAck> {
        if let Some(max) = self.config.max_advance_secs {
            if shift.as_secs() > max {
                warn!("Refusing shift of {} above configured maximum {}s", shift, max);
                return Err(ClockError::rejected(
                    None,
                    format!("shift of {} exceeds maximum advance of {}s", shift, max),
                ));
            }
        }

        let reply = self
            .call(
                Operation::ShiftTime,
                &self.config.shift_time_method,
                json!([shift.as_secs()]),
            )
            .await?;

        match reply {
            RpcReply::Result(value) => Ok(ShiftAck {
                total_offset: parse_quantity(&value),
            }),
            RpcReply::Error(error) => {
                warn!(
                    "Node rejected time shift of {}: {} ({})",
                    shift, error.message, error.code
                );
                Err(ClockError::rejected(Some(error.code), error.message))
            }
        }
    }

    async fn mine_block(&self) -> ClockResult<Block> {
        // evm_mine acknowledges with "0x0", the produced block is read back
        self.call_result(
            Operation::MineBlock,
            &self.config.mine_block_method,
            json!([]),
        )
        .await?;

        self.fetch_latest(Operation::MineBlock).await?.ok_or_else(|| {
            ClockError::transport(
                Operation::MineBlock,
                "node acknowledged mining but reports no latest block",
            )
        })
    }
}

impl std::fmt::Debug for JsonRpcChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcChannel")
            .field("url", &self.url.as_str())
            .finish()
    }
}
