//! Ledger SDK boundary
//!
//! Transaction construction, signing and transport belong to the chain SDK.
//! Everything the deploy flows need from it fits behind [`LedgerSdk`]:
//! build an invocation, simulate it for fees and return value, submit it.

pub mod error;
#[cfg(any(test, feature = "mock-sdk"))]
pub mod mock;
pub mod types;

use async_trait::async_trait;
use std::fmt::Debug;

pub use error::SdkError;
#[cfg(any(test, feature = "mock-sdk"))]
pub use mock::MockLedgerSdk;
pub use types::{Invocation, InvocationArg, SimulationResult};

#[async_trait]
pub trait LedgerSdk: Send + Sync + Debug {
    /// Prepare a contract call
    async fn build_invocation(
        &self,
        contract_id: &str,
        function: &str,
        args: Vec<InvocationArg>,
    ) -> Result<Invocation, SdkError>;

    /// Dry-run an invocation to learn its fee and return value
    async fn simulate(&self, invocation: &Invocation) -> Result<SimulationResult, SdkError>;

    /// Sign and submit; returns the transaction hash to monitor
    async fn submit(
        &self,
        invocation: &Invocation,
        simulation: &SimulationResult,
    ) -> Result<String, SdkError>;

    /// Validate an address format
    fn validate_address(&self, address: &str) -> bool;
}
