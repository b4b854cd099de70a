use std::time::Duration;
use thiserror::Error;

/// Errors surfaced to the caller of the monitor.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MonitorError {
    #[error("Invalid transaction identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error(
        "Monitoring timed out for {identifier} after {elapsed:?} ({attempts} polls, {failed_attempts} failed)"
    )]
    MonitoringTimeout {
        identifier: String,
        elapsed: Duration,
        attempts: u32,
        failed_attempts: u32,
    },

    #[error("Invalid polling policy: {0}")]
    InvalidPolicy(String),

    #[error("Monitoring cancelled for {0}")]
    Cancelled(String),
}

impl MonitorError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            MonitorError::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            MonitorError::MonitoringTimeout { .. } => "MONITORING_TIMEOUT",
            MonitorError::InvalidPolicy(_) => "INVALID_POLICY",
            MonitorError::Cancelled(_) => "MONITORING_CANCELLED",
        }
    }
}

/// A single failed status query. The monitor treats every variant as
/// transient: it logs, counts and keeps polling.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Status provider unreachable: {0}")]
    Unreachable(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Malformed status response: {0}")]
    Malformed(String),

    #[error("Transaction not found: {0}")]
    NotFound(String),
}
