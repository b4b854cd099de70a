use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

use crate::monitor::rpc::MAX_FEE_DECIMALS;
use crate::monitor::{MonitorError, PollingPolicy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<MonitorError> for ConfigError {
    fn from(e: MonitorError) -> Self {
        ConfigError::Invalid(e.to_string())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// Per-poll debug output from the monitor
    #[serde(default)]
    pub enable_tracing: bool,
    /// Polling policy applied to every monitoring session
    #[serde(default)]
    pub monitor: PollingPolicy,
    pub rpc: RpcConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RpcConfig {
    pub url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Decimal places of the fee unit reported by the node
    #[serde(default = "default_fee_decimals")]
    pub fee_decimals: u32,
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_fee_decimals() -> u32 {
    7
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LedgerConfig {
    /// Contract that deploys new token contracts
    pub token_factory_id: String,
    /// Base URL for transaction links, e.g. `https://explorer.example/testnet`
    #[serde(default)]
    pub explorer_base_url: Option<String>,
    /// Mock SDK only: pending polls before a submitted transaction succeeds
    #[serde(default = "default_mock_confirm_polls")]
    pub mock_confirm_polls: u32,
}

fn default_mock_confirm_polls() -> u32 {
    2
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            token_factory_id: "CTOKENFACTORYAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".to_string(),
            explorer_base_url: None,
            mock_confirm_polls: default_mock_confirm_polls(),
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        Self::from_file(&format!("config/{}.yaml", env))
    }

    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        config.monitor.validate()?;
        if config.rpc.fee_decimals > MAX_FEE_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "rpc.fee_decimals must be at most {}, got {}",
                MAX_FEE_DECIMALS, config.rpc.fee_decimals
            )));
        }
        Ok(config)
    }
}
