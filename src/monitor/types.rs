//! Transaction status value types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a submitted transaction.
///
/// Terminal states: SUCCESS, FAILED. A terminal state never transitions again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxState {
    Pending,
    Success,
    Failed,
}

impl TxState {
    /// Check if this is a terminal state (no more transitions possible)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TxState::Success | TxState::Failed)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: TxState) -> bool {
        match self {
            TxState::Pending => true,
            terminal => *terminal == next,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxState::Pending => "PENDING",
            TxState::Success => "SUCCESS",
            TxState::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One observation of a transaction, as delivered to progress callbacks and
/// returned by the monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionStatus {
    pub identifier: String,
    pub state: TxState,
    pub observed_at: DateTime<Utc>,
    /// Only populated once the transaction is resolved.
    pub fee: Option<Decimal>,
}

impl TransactionStatus {
    pub fn pending(identifier: &str, observed_at: DateTime<Utc>) -> Self {
        Self {
            identifier: identifier.to_string(),
            state: TxState::Pending,
            observed_at,
            fee: None,
        }
    }

    /// Build an observation from a provider report. A fee reported for a
    /// pending transaction is dropped.
    pub fn from_report(identifier: &str, report: StatusReport, observed_at: DateTime<Utc>) -> Self {
        let fee = if report.state.is_terminal() {
            report.fee
        } else {
            None
        };
        Self {
            identifier: identifier.to_string(),
            state: report.state,
            observed_at,
            fee,
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Raw answer of a status provider for a single query.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub state: TxState,
    pub fee: Option<Decimal>,
    /// Ledger close time of the transaction, when the provider knows it.
    pub ledger_time: Option<DateTime<Utc>>,
}

impl StatusReport {
    pub fn pending() -> Self {
        Self {
            state: TxState::Pending,
            fee: None,
            ledger_time: None,
        }
    }

    pub fn success(fee: Decimal) -> Self {
        Self {
            state: TxState::Success,
            fee: Some(fee),
            ledger_time: None,
        }
    }

    pub fn failed(fee: Option<Decimal>) -> Self {
        Self {
            state: TxState::Failed,
            fee,
            ledger_time: None,
        }
    }
}

/// How a cancellable monitoring session settled.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorOutcome {
    Completed(TransactionStatus),
    Cancelled,
}

impl MonitorOutcome {
    pub fn status(&self) -> Option<&TransactionStatus> {
        match self {
            MonitorOutcome::Completed(status) => Some(status),
            MonitorOutcome::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, MonitorOutcome::Cancelled)
    }
}
