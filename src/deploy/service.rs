use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::error::DeployError;
use super::receipt::{DeploymentReceipt, explorer_url};
use super::validation::{validate_address, validate_amount, validate_token_metadata};
use crate::ledger::{InvocationArg, LedgerSdk};
use crate::monitor::{TransactionMonitor, TransactionStatus, TxState};

#[derive(Debug, Clone, Deserialize)]
pub struct DeployTokenRequest {
    pub admin: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MintRequest {
    /// Token contract to mint on
    pub token: String,
    pub to: String,
    pub amount: Decimal,
}

pub struct TokenDeployer {
    sdk: Arc<dyn LedgerSdk>,
    monitor: Arc<TransactionMonitor>,
    factory_id: String,
    explorer_base_url: Option<String>,
}

impl TokenDeployer {
    pub fn new(
        sdk: Arc<dyn LedgerSdk>,
        monitor: Arc<TransactionMonitor>,
        factory_id: impl Into<String>,
    ) -> Self {
        Self {
            sdk,
            monitor,
            factory_id: factory_id.into(),
            explorer_base_url: None,
        }
    }

    pub fn with_explorer(mut self, base_url: impl Into<String>) -> Self {
        self.explorer_base_url = Some(base_url.into());
        self
    }

    /// Deploy a new token contract through the factory
    /// 1. Validate request
    /// 2. Build + simulate (simulation yields the new contract id)
    /// 3. Submit and monitor until settled
    #[instrument(skip_all, fields(symbol = %request.symbol))]
    pub async fn deploy_token(
        &self,
        request: &DeployTokenRequest,
    ) -> Result<DeploymentReceipt, DeployError> {
        validate_address(self.sdk.as_ref(), "admin", &request.admin)?;
        validate_token_metadata(&request.name, &request.symbol, request.decimals)?;

        let invocation = self
            .sdk
            .build_invocation(
                &self.factory_id,
                "deploy_token",
                vec![
                    InvocationArg::Address(request.admin.clone()),
                    InvocationArg::String(request.name.trim().to_string()),
                    InvocationArg::String(request.symbol.clone()),
                    InvocationArg::U32(request.decimals),
                ],
            )
            .await?;

        let simulation = self.sdk.simulate(&invocation).await?;
        let contract_id = simulation
            .return_value
            .as_ref()
            .and_then(InvocationArg::as_address)
            .map(str::to_string)
            .ok_or(DeployError::MissingContractAddress)?;

        info!(
            contract = %contract_id,
            min_fee = %simulation.min_fee,
            "Deployment simulated, submitting"
        );

        let tx_hash = self.sdk.submit(&invocation, &simulation).await?;
        let status = self.monitor.monitor(&tx_hash).await?;
        self.finish(tx_hash, contract_id, status)
    }

    /// Mint `amount` of `token` to `to`
    #[instrument(skip_all, fields(token = %request.token))]
    pub async fn mint(&self, request: &MintRequest) -> Result<DeploymentReceipt, DeployError> {
        validate_address(self.sdk.as_ref(), "token", &request.token)?;
        validate_address(self.sdk.as_ref(), "to", &request.to)?;
        validate_amount(request.amount)?;

        let invocation = self
            .sdk
            .build_invocation(
                &request.token,
                "mint",
                vec![
                    InvocationArg::Address(request.to.clone()),
                    InvocationArg::Amount(request.amount),
                ],
            )
            .await?;

        let simulation = self.sdk.simulate(&invocation).await?;
        let tx_hash = self.sdk.submit(&invocation, &simulation).await?;
        let status = self.monitor.monitor(&tx_hash).await?;
        self.finish(tx_hash, request.token.clone(), status)
    }

    fn finish(
        &self,
        tx_hash: String,
        contract_id: String,
        status: TransactionStatus,
    ) -> Result<DeploymentReceipt, DeployError> {
        if status.state == TxState::Failed {
            warn!(tx = %tx_hash, fee = ?status.fee, "Transaction failed on ledger");
            return Err(DeployError::TransactionFailed { tx_hash });
        }

        let receipt = DeploymentReceipt {
            explorer_url: self
                .explorer_base_url
                .as_deref()
                .map(|base| explorer_url(base, &tx_hash)),
            tx_hash,
            fee: status.fee,
            contract_id,
        };
        info!("Transaction succeeded: {}", receipt.summary());
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::test_helpers::MockClock;
    use crate::ledger::MockLedgerSdk;
    use crate::ledger::mock::mock_contract_address;
    use crate::monitor::PollingPolicy;

    fn account(tag: char) -> String {
        format!("G{}", tag.to_string().repeat(55))
    }

    fn deployer(sdk: Arc<MockLedgerSdk>) -> TokenDeployer {
        let monitor = TransactionMonitor::with_clock(
            sdk.clone(),
            PollingPolicy::default(),
            Arc::new(MockClock::default()),
        )
        .unwrap();
        TokenDeployer::new(sdk, Arc::new(monitor), mock_contract_address("factory"))
            .with_explorer("https://explorer.example/testnet")
    }

    #[tokio::test]
    async fn test_deploy_token_happy_path() {
        let sdk = Arc::new(MockLedgerSdk::new(2));
        let receipt = deployer(sdk.clone())
            .deploy_token(&DeployTokenRequest {
                admin: account('A'),
                name: "Demo Token".into(),
                symbol: "DEMO".into(),
                decimals: 7,
            })
            .await
            .unwrap();

        assert!(receipt.contract_id.starts_with('C'));
        assert_eq!(receipt.fee, Some(Decimal::new(300, 7)));
        assert_eq!(
            receipt.explorer_url,
            Some(format!(
                "https://explorer.example/testnet/tx/{}",
                receipt.tx_hash
            ))
        );
        assert_eq!(sdk.submitted_count(), 1);
    }

    #[tokio::test]
    async fn test_mint_rejects_bad_input_before_sdk() {
        let sdk = Arc::new(MockLedgerSdk::new(0));
        let deployer = deployer(sdk.clone());
        let token = mock_contract_address("token");

        let err = deployer
            .mint(&MintRequest {
                token: token.clone(),
                to: String::new(),
                amount: Decimal::ONE,
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DeployError::InvalidAddress {
                field: "to",
                value: String::new()
            }
        );

        let err = deployer
            .mint(&MintRequest {
                token,
                to: account('B'),
                amount: Decimal::ZERO,
            })
            .await
            .unwrap_err();
        assert_eq!(err, DeployError::InvalidAmount);
        assert_eq!(sdk.submitted_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_mint_surfaces_transaction_failed() {
        let sdk = Arc::new(MockLedgerSdk::new(1).with_failing_function("mint"));
        let err = deployer(sdk)
            .mint(&MintRequest {
                token: mock_contract_address("token"),
                to: account('B'),
                amount: Decimal::new(1000, 2),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "TRANSACTION_FAILED");
    }
}
