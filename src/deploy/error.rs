use thiserror::Error;

use crate::ledger::SdkError;
use crate::monitor::MonitorError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeployError {
    // === Validation Errors ===
    #[error("Invalid address for {field}: {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Invalid token metadata: {0}")]
    InvalidTokenMetadata(String),

    // === Ledger Errors ===
    #[error("SDK error: {0}")]
    Sdk(#[from] SdkError),

    #[error("Simulation returned no contract address")]
    MissingContractAddress,

    #[error("Monitoring error: {0}")]
    Monitor(#[from] MonitorError),

    #[error("Transaction {tx_hash} failed on ledger")]
    TransactionFailed { tx_hash: String },
}

impl DeployError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            DeployError::InvalidAddress { .. } => "INVALID_ADDRESS",
            DeployError::InvalidAmount => "INVALID_AMOUNT",
            DeployError::InvalidTokenMetadata(_) => "INVALID_TOKEN_METADATA",
            DeployError::Sdk(_) => "SDK_ERROR",
            DeployError::MissingContractAddress => "MISSING_CONTRACT_ADDRESS",
            DeployError::Monitor(e) => e.code(),
            DeployError::TransactionFailed { .. } => "TRANSACTION_FAILED",
        }
    }

    /// Whether the caller can fix this by changing the request
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DeployError::InvalidAddress { .. }
                | DeployError::InvalidAmount
                | DeployError::InvalidTokenMetadata(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_codes() {
        assert_eq!(DeployError::InvalidAmount.code(), "INVALID_AMOUNT");
        assert_eq!(
            DeployError::Monitor(MonitorError::MonitoringTimeout {
                identifier: "x".into(),
                elapsed: Duration::from_secs(60),
                attempts: 10,
                failed_attempts: 0,
            })
            .code(),
            "MONITORING_TIMEOUT"
        );
        assert_eq!(
            DeployError::Sdk(SdkError::Network("down".into())).code(),
            "SDK_ERROR"
        );
    }

    #[test]
    fn test_user_errors() {
        assert!(DeployError::InvalidAmount.is_user_error());
        assert!(
            DeployError::InvalidAddress {
                field: "to",
                value: String::new()
            }
            .is_user_error()
        );
        assert!(
            !DeployError::TransactionFailed {
                tx_hash: "abc".into()
            }
            .is_user_error()
        );
    }
}
