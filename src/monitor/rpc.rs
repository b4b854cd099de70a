//! JSON-RPC Status Provider
//!
//! Queries a ledger RPC node with `getTransaction` and maps the answer onto
//! [`StatusReport`]. `NOT_FOUND` is reported as pending: a freshly submitted
//! transaction is routinely unknown to the node for a ledger or two.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::error::ProviderError;
use super::provider::StatusProvider;
use super::types::{StatusReport, TxState};
use crate::config::RpcConfig;

/// Largest scale a [`Decimal`] can carry
pub const MAX_FEE_DECIMALS: u32 = 28;

/// Status provider backed by a JSON-RPC 2.0 endpoint
pub struct RpcStatusProvider {
    url: String,
    fee_decimals: u32,
    client: reqwest::Client,
}

/// JSON-RPC request structure
#[derive(Serialize)]
struct JsonRpcRequest<T> {
    jsonrpc: &'static str,
    method: &'static str,
    params: T,
    id: u64,
}

/// JSON-RPC response structure
#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Serialize)]
struct GetTransactionParams<'a> {
    hash: &'a str,
}

/// `getTransaction` result
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RpcTransaction {
    status: String,
    /// Fee in base units, as a decimal integer string
    #[serde(default)]
    fee_charged: Option<String>,
    /// Unix seconds, as a string
    #[serde(default)]
    created_at: Option<String>,
}

impl RpcStatusProvider {
    pub fn new(config: &RpcConfig) -> Result<Self, ProviderError> {
        info!(
            "Initializing RPC status provider at {} (timeout {}ms)",
            config.url, config.request_timeout_ms
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| {
                ProviderError::Unreachable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            url: config.url.clone(),
            fee_decimals: config.fee_decimals,
            client,
        })
    }

    /// Make a JSON-RPC call
    async fn rpc_call<T, R>(&self, method: &'static str, params: T) -> Result<R, ProviderError>
    where
        T: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable(format!("HTTP request failed: {}", e)))?;

        let rpc_response: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(format!("Failed to parse response: {}", e)))?;

        if let Some(error) = rpc_response.error {
            return Err(ProviderError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        rpc_response
            .result
            .ok_or_else(|| ProviderError::Malformed("No result in RPC response".to_string()))
    }
}

#[async_trait]
impl StatusProvider for RpcStatusProvider {
    async fn fetch_status(&self, identifier: &str) -> Result<StatusReport, ProviderError> {
        let tx: RpcTransaction = self
            .rpc_call("getTransaction", GetTransactionParams { hash: identifier })
            .await?;
        debug!(status = %tx.status, "getTransaction");
        map_rpc_transaction(tx, self.fee_decimals)
    }

    /// Ledger transaction hashes are 32 bytes, hex encoded.
    fn validate_identifier(&self, identifier: &str) -> bool {
        is_tx_hash(identifier)
    }
}

pub fn is_tx_hash(identifier: &str) -> bool {
    identifier.len() == 64 && identifier.chars().all(|c| c.is_ascii_hexdigit())
}

fn map_rpc_transaction(tx: RpcTransaction, fee_decimals: u32) -> Result<StatusReport, ProviderError> {
    let state = match tx.status.as_str() {
        "SUCCESS" => TxState::Success,
        "FAILED" => TxState::Failed,
        "NOT_FOUND" | "PENDING" => TxState::Pending,
        other => {
            return Err(ProviderError::Malformed(format!(
                "Unknown transaction status: {}",
                other
            )));
        }
    };

    // A settled transaction stays settled even when its fee is unreadable.
    let fee = match tx.fee_charged.as_deref().map(|raw| scale_fee(raw, fee_decimals)) {
        Some(Ok(fee)) => Some(fee),
        Some(Err(e)) => {
            warn!(state = %state, error = %e, "Dropping unreadable fee");
            None
        }
        None => None,
    };

    let ledger_time = tx
        .created_at
        .as_deref()
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

    Ok(StatusReport {
        state,
        fee,
        ledger_time,
    })
}

/// Convert an integer amount of base units into a decimal with `decimals` places.
pub fn scale_fee(raw: &str, decimals: u32) -> Result<Decimal, ProviderError> {
    let mut value = Decimal::from_str(raw)
        .map_err(|e| ProviderError::Malformed(format!("Invalid fee {:?}: {}", raw, e)))?;
    value
        .set_scale(value.scale() + decimals)
        .map_err(|e| ProviderError::Malformed(format!("Fee scale out of range: {}", e)))?;
    Ok(value.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> RpcConfig {
        RpcConfig {
            url: "http://127.0.0.1:8000/rpc".to_string(),
            request_timeout_ms: 5_000,
            fee_decimals: 7,
        }
    }

    fn parse(json: &str) -> RpcTransaction {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_success_with_fee() {
        let tx = parse(r#"{"status":"SUCCESS","feeCharged":"12345","createdAt":"1700000000"}"#);
        let report = map_rpc_transaction(tx, 7).unwrap();

        assert_eq!(report.state, TxState::Success);
        assert_eq!(report.fee, Some(Decimal::new(12345, 7)));
        assert_eq!(report.ledger_time.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_not_found_is_pending() {
        let report = map_rpc_transaction(parse(r#"{"status":"NOT_FOUND"}"#), 7).unwrap();
        assert_eq!(report.state, TxState::Pending);
        assert_eq!(report.fee, None);
        assert_eq!(report.ledger_time, None);
    }

    #[test]
    fn test_failed_status() {
        let report = map_rpc_transaction(parse(r#"{"status":"FAILED","feeCharged":"100"}"#), 7)
            .unwrap();
        assert_eq!(report.state, TxState::Failed);
        assert_eq!(report.fee, Some(Decimal::new(1, 5)));
    }

    #[test]
    fn test_unreadable_fee_keeps_settled_state() {
        let oversized = r#"{"status":"SUCCESS","feeCharged":"123456789012345678901234567890"}"#;
        let report = map_rpc_transaction(parse(oversized), 7).unwrap();
        assert_eq!(report.state, TxState::Success);
        assert_eq!(report.fee, None);

        let report =
            map_rpc_transaction(parse(r#"{"status":"FAILED","feeCharged":"100"}"#), 29).unwrap();
        assert_eq!(report.state, TxState::Failed);
        assert_eq!(report.fee, None);
    }

    /// Answers every query with the same `getTransaction` payload
    struct CannedRpcAnswer {
        json: &'static str,
        fee_decimals: u32,
    }

    #[async_trait]
    impl StatusProvider for CannedRpcAnswer {
        async fn fetch_status(&self, _identifier: &str) -> Result<StatusReport, ProviderError> {
            map_rpc_transaction(parse(self.json), self.fee_decimals)
        }
    }

    #[tokio::test]
    async fn test_settled_answer_with_bad_fee_resolves_monitor() {
        use crate::clock::test_helpers::MockClock;
        use crate::monitor::{PollingPolicy, TransactionMonitor};
        use std::sync::Arc;

        let provider = Arc::new(CannedRpcAnswer {
            json: r#"{"status":"SUCCESS","feeCharged":"123456789012345678901234567890"}"#,
            fee_decimals: 7,
        });
        let clock = Arc::new(MockClock::default());
        let monitor =
            TransactionMonitor::with_clock(provider, PollingPolicy::default(), clock.clone())
                .unwrap();

        let status = monitor.monitor(&"a".repeat(64)).await.unwrap();
        assert_eq!(status.state, TxState::Success);
        assert_eq!(status.fee, None);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn test_unknown_status_is_malformed() {
        let result = map_rpc_transaction(parse(r#"{"status":"EXPLODED"}"#), 7);
        assert!(matches!(result, Err(ProviderError::Malformed(_))));
    }

    #[test]
    fn test_scale_fee() {
        assert_eq!(scale_fee("10000000", 7).unwrap(), Decimal::ONE);
        assert_eq!(scale_fee("0", 7).unwrap(), Decimal::ZERO);
        assert!(scale_fee("abc", 7).is_err());
    }

    #[test]
    fn test_tx_hash_validation() {
        let hash = "a".repeat(64);
        assert!(is_tx_hash(&hash));
        assert!(is_tx_hash(&"0123456789ABCDEF".repeat(4)));
        assert!(!is_tx_hash("deadbeef"));
        assert!(!is_tx_hash(&"g".repeat(64)));
    }

    /// Provider creation doesn't require a running node
    #[test]
    fn test_provider_creation() {
        let provider = RpcStatusProvider::new(&test_config()).unwrap();
        assert_eq!(provider.fee_decimals, 7);
        assert!(!provider.validate_identifier("deadbeef"));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transient_error() {
        let config = RpcConfig {
            // Port 9 (discard) on localhost is closed in test environments.
            url: "http://127.0.0.1:9/rpc".to_string(),
            request_timeout_ms: 500,
            fee_decimals: 7,
        };
        let provider = RpcStatusProvider::new(&config).unwrap();
        let result = provider.fetch_status(&"a".repeat(64)).await;
        assert!(matches!(result, Err(ProviderError::Unreachable(_))));
    }
}
