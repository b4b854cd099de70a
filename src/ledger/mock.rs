//! In-memory ledger for demos and tests.
//!
//! Accepts every well-formed invocation, derives contract addresses
//! deterministically, and serves the status of the transactions it accepted
//! so the whole build → simulate → submit → monitor flow runs offline.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tracing::debug;

use super::error::SdkError;
use super::types::{Invocation, InvocationArg, SimulationResult};
use super::LedgerSdk;
use crate::monitor::{ProviderError, StatusProvider, StatusReport, TxState};

/// Base fee in stroop-sized units (7 decimals)
const BASE_FEE_UNITS: i64 = 100;
const FEE_PER_ARG_UNITS: i64 = 50;
const FEE_DECIMALS: u32 = 7;

#[derive(Debug, Clone)]
struct MockTx {
    polls_remaining: u32,
    outcome: TxState,
    fee: Decimal,
}

#[derive(Debug)]
pub struct MockLedgerSdk {
    confirm_polls: u32,
    failing_functions: HashSet<String>,
    submitted: Mutex<HashMap<String, MockTx>>,
}

impl MockLedgerSdk {
    /// `confirm_polls`: pending answers before a submitted transaction settles
    pub fn new(confirm_polls: u32) -> Self {
        Self {
            confirm_polls,
            failing_functions: HashSet::new(),
            submitted: Mutex::new(HashMap::new()),
        }
    }

    /// Transactions invoking `function` will settle as FAILED
    pub fn with_failing_function(mut self, function: &str) -> Self {
        self.failing_functions.insert(function.to_string());
        self
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted.lock().expect("mock ledger poisoned").len()
    }

    fn fee_for(invocation: &Invocation) -> Decimal {
        Decimal::new(
            BASE_FEE_UNITS + FEE_PER_ARG_UNITS * invocation.args.len() as i64,
            FEE_DECIMALS,
        )
    }
}

/// Deterministic 56-char contract address for a deployment.
pub fn mock_contract_address(seed: &str) -> String {
    let first = md5::compute(format!("contract_{}", seed));
    let second = md5::compute(format!("contract_{}_tail", seed));
    let hex = format!("{:x}{:x}", first, second).to_uppercase();
    format!("C{}", &hex[..55])
}

/// Random 64-hex transaction hash
fn mock_tx_hash() -> String {
    format!(
        "{:x}{:x}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

#[async_trait]
impl LedgerSdk for MockLedgerSdk {
    async fn build_invocation(
        &self,
        contract_id: &str,
        function: &str,
        args: Vec<InvocationArg>,
    ) -> Result<Invocation, SdkError> {
        if !self.validate_address(contract_id) {
            return Err(SdkError::InvalidAddress(contract_id.to_string()));
        }
        Ok(Invocation {
            contract_id: contract_id.to_string(),
            function: function.to_string(),
            args,
        })
    }

    async fn simulate(&self, invocation: &Invocation) -> Result<SimulationResult, SdkError> {
        let return_value = match invocation.function.as_str() {
            "deploy_token" => {
                let seed = serde_json::to_string(&invocation.args)
                    .map_err(|e| SdkError::Simulation(e.to_string()))?;
                Some(InvocationArg::Address(mock_contract_address(&seed)))
            }
            _ => None,
        };

        Ok(SimulationResult {
            min_fee: Self::fee_for(invocation),
            return_value,
        })
    }

    async fn submit(
        &self,
        invocation: &Invocation,
        simulation: &SimulationResult,
    ) -> Result<String, SdkError> {
        let hash = mock_tx_hash();
        let outcome = if self.failing_functions.contains(&invocation.function) {
            TxState::Failed
        } else {
            TxState::Success
        };

        debug!(
            tx = %hash,
            function = %invocation.function,
            outcome = %outcome,
            "Mock ledger accepted transaction"
        );

        self.submitted.lock().expect("mock ledger poisoned").insert(
            hash.clone(),
            MockTx {
                polls_remaining: self.confirm_polls,
                outcome,
                fee: simulation.min_fee,
            },
        );
        Ok(hash)
    }

    /// 56 uppercase alphanumerics starting with `G` (account) or `C` (contract)
    fn validate_address(&self, address: &str) -> bool {
        address.len() == 56
            && (address.starts_with('G') || address.starts_with('C'))
            && address
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    }
}

#[async_trait]
impl StatusProvider for MockLedgerSdk {
    async fn fetch_status(&self, identifier: &str) -> Result<StatusReport, ProviderError> {
        let mut submitted = self.submitted.lock().expect("mock ledger poisoned");
        let tx = submitted
            .get_mut(identifier)
            .ok_or_else(|| ProviderError::NotFound(identifier.to_string()))?;

        if tx.polls_remaining > 0 {
            tx.polls_remaining -= 1;
            return Ok(StatusReport::pending());
        }

        Ok(match tx.outcome {
            TxState::Failed => StatusReport::failed(Some(tx.fee)),
            _ => StatusReport::success(tx.fee),
        })
    }
}
