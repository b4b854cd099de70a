//! Transaction Monitor
//!
//! Tracks a submitted transaction until it settles:
//! - Exponential backoff between polls, capped per policy
//! - Hard deadline (`MonitoringTimeout`)
//! - Transient provider failures retried until the deadline
//! - Cooperative cancellation at every suspension point

pub mod cancel;
pub mod error;
#[cfg(any(test, feature = "mock-sdk"))]
pub mod mock;
pub mod policy;
pub mod provider;
pub mod rpc;
pub mod session;
pub mod types;

// Re-exports for convenience
pub use cancel::CancelSignal;
pub use error::{MonitorError, ProviderError};
pub use policy::{Backoff, PollingPolicy};
#[cfg(any(test, feature = "mock-sdk"))]
pub use mock::MockStatusProvider;
pub use provider::{StatusProvider, is_well_formed_identifier};
pub use rpc::RpcStatusProvider;
pub use session::TransactionMonitor;
pub use types::{MonitorOutcome, StatusReport, TransactionStatus, TxState};
