//! tokenpad - Token Deployment Dashboard Core
//!
//! Deploys and mints tokens through a chain SDK and watches the resulting
//! transactions until they settle.
//!
//! # Modules
//!
//! - [`monitor`] - Transaction monitor (polling, backoff, timeout, cancellation)
//! - [`clock`] - Injectable time source for the monitor
//! - [`ledger`] - SDK boundary (`build_invocation`, `simulate`, `submit`) and mock ledger
//! - [`deploy`] - Deploy-token and mint flows with input guards
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

pub mod clock;
pub mod config;
pub mod deploy;
pub mod ledger;
pub mod logging;
pub mod monitor;

// Convenient re-exports at crate root
pub use clock::{Clock, TokioClock};
pub use config::{AppConfig, ConfigError};
pub use deploy::{DeployError, DeployTokenRequest, DeploymentReceipt, MintRequest, TokenDeployer};
pub use ledger::{LedgerSdk, SdkError};
#[cfg(feature = "mock-sdk")]
pub use ledger::MockLedgerSdk;
pub use monitor::{
    CancelSignal, MonitorError, MonitorOutcome, PollingPolicy, ProviderError, RpcStatusProvider,
    StatusProvider, TransactionMonitor, TransactionStatus, TxState,
};
