use crate::error::ConfigError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default values for configuration
pub mod defaults {
    pub const ENDPOINT: &str = "http://127.0.0.1:8545";

    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;

    // Test-mode node vocabulary (ganache / hardhat / anvil)
    pub const LATEST_BLOCK_METHOD: &str = "eth_getBlockByNumber";
    pub const SHIFT_TIME_METHOD: &str = "evm_increaseTime";
    pub const MINE_BLOCK_METHOD: &str = "evm_mine";

    // Validation limits
    pub const MIN_TIMEOUT_SECS: u64 = 1;
    pub const MAX_TIMEOUT_SECS: u64 = 300;
}

/// Connection settings for [`crate::channel::JsonRpcChannel`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Node JSON-RPC endpoint, `http://` is assumed when no scheme is given
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,

    #[serde(default = "default_latest_block_method")]
    pub latest_block_method: String,

    #[serde(default = "default_shift_time_method")]
    pub shift_time_method: String,

    #[serde(default = "default_mine_block_method")]
    pub mine_block_method: String,

    /// Largest single shift accepted; larger shifts are rejected without
    /// contacting the node
    #[serde(default)]
    pub max_advance_secs: Option<u64>,
}

// Default functions for serde
fn default_endpoint() -> String {
    defaults::ENDPOINT.to_string()
}
fn default_request_timeout_secs() -> u64 {
    defaults::REQUEST_TIMEOUT_SECS
}
fn default_connection_timeout_secs() -> u64 {
    defaults::CONNECTION_TIMEOUT_SECS
}
fn default_latest_block_method() -> String {
    defaults::LATEST_BLOCK_METHOD.to_string()
}
fn default_shift_time_method() -> String {
    defaults::SHIFT_TIME_METHOD.to_string()
}
fn default_mine_block_method() -> String {
    defaults::MINE_BLOCK_METHOD.to_string()
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
            connection_timeout_secs: default_connection_timeout_secs(),
            latest_block_method: default_latest_block_method(),
            shift_time_method: default_shift_time_method(),
            mine_block_method: default_mine_block_method(),
            max_advance_secs: None,
        }
    }
}

impl ChannelConfig {
    /// Default configuration pointed at `endpoint`
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_max_advance_secs(mut self, max: u64) -> Self {
        self.max_advance_secs = Some(max);
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Load and validate a JSON configuration file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading channel config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        info!("Loaded channel config for endpoint {}", config.endpoint);
        Ok(config)
    }

    /// Check every field, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint_url()?;
        validate_timeout("request_timeout_secs", self.request_timeout_secs)?;
        validate_timeout("connection_timeout_secs", self.connection_timeout_secs)?;

        for (name, method) in [
            ("latest_block_method", &self.latest_block_method),
            ("shift_time_method", &self.shift_time_method),
            ("mine_block_method", &self.mine_block_method),
        ] {
            if method.trim().is_empty() {
                return Err(ConfigError::EmptyMethod(name));
            }
        }

        if self.max_advance_secs == Some(0) {
            return Err(ConfigError::InvalidMaxAdvance);
        }

        Ok(())
    }

    /// Parsed endpoint URL
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let raw = self.endpoint.trim();
        let url_str = if raw.starts_with("http://") || raw.starts_with("https://") {
            raw.to_string()
        } else {
            format!("http://{}", raw)
        };

        let url = Url::parse(&url_str).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: "missing host".to_string(),
            });
        }

        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }
}

fn validate_timeout(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if !(defaults::MIN_TIMEOUT_SECS..=defaults::MAX_TIMEOUT_SECS).contains(&value) {
        return Err(ConfigError::InvalidTimeout {
            field,
            value,
            min: defaults::MIN_TIMEOUT_SECS,
            max: defaults::MAX_TIMEOUT_SECS,
        });
    }
    Ok(())
}
