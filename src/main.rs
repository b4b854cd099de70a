//! tokenpad - command line entry point
//!
//! ```text
//! tokenpad [--env <name>] [--config <path>] --watch <hash> [--watch <hash> ...]
//! tokenpad [--env <name>] [--config <path>] --demo
//! ```
//!
//! `--watch` monitors submitted transactions concurrently over the configured
//! RPC node; Ctrl-C cancels every session. `--demo` deploys and mints a token
//! against the in-memory ledger.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use tokenpad::config::AppConfig;
use tokenpad::deploy::short_id;
use tokenpad::monitor::{
    CancelSignal, MonitorOutcome, RpcStatusProvider, TransactionMonitor, TxState,
};

// ============================================================
// ARGUMENTS
// ============================================================

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

fn get_config_path() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--config" && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

/// Every value following a `--watch` flag
fn get_watch_hashes() -> Vec<String> {
    let args: Vec<String> = std::env::args().collect();
    args.windows(2)
        .filter(|pair| pair[0] == "--watch")
        .map(|pair| pair[1].clone())
        .collect()
}

fn use_demo_mode() -> bool {
    std::env::args().any(|a| a == "--demo")
}

fn print_usage() {
    eprintln!("usage: tokenpad [--env <name>] [--config <path>] (--watch <hash>... | --demo)");
}

// ============================================================
// MAIN
// ============================================================

#[tokio::main]
async fn main() -> ExitCode {
    let env = get_env();
    let loaded = match get_config_path() {
        Some(path) => AppConfig::from_file(&path),
        None => AppConfig::load(&env),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            // Logging is configured from this file, so report to stderr.
            eprintln!("tokenpad: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = tokenpad::logging::init_logging(&config);

    info!("Starting tokenpad v{} in {} mode", env!("CARGO_PKG_VERSION"), env);

    let watch = get_watch_hashes();
    let result = if use_demo_mode() {
        run_demo(&config).await
    } else if !watch.is_empty() {
        run_watch(&config, &watch).await
    } else {
        print_usage();
        return ExitCode::FAILURE;
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================
// WATCH
// ============================================================

async fn run_watch(config: &AppConfig, hashes: &[String]) -> anyhow::Result<()> {
    let provider = RpcStatusProvider::new(&config.rpc).context("creating RPC status provider")?;
    let monitor = TransactionMonitor::new(Arc::new(provider), config.monitor.clone())?;

    let cancel = CancelSignal::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Ctrl-C received, cancelling monitoring sessions");
                cancel.request_cancel();
            }
        });
    }

    info!("Watching {} transaction(s)", hashes.len());

    let sessions = hashes.iter().map(|hash| {
        monitor.monitor_cancellable(
            hash,
            |status| {
                info!(
                    tx = %short_id(&status.identifier),
                    state = %status.state,
                    observed_at = %status.observed_at,
                    "Progress"
                );
                Ok(())
            },
            &cancel,
        )
    });
    let results = futures::future::join_all(sessions).await;

    let mut failures = 0usize;
    for (hash, result) in hashes.iter().zip(results) {
        match result {
            Ok(MonitorOutcome::Completed(status)) if status.state == TxState::Success => {
                info!(tx = %hash, fee = ?status.fee, "SUCCESS");
            }
            Ok(MonitorOutcome::Completed(status)) => {
                failures += 1;
                error!(tx = %hash, fee = ?status.fee, "FAILED on ledger");
            }
            Ok(MonitorOutcome::Cancelled) => {
                failures += 1;
                warn!(tx = %hash, "Cancelled before settling");
            }
            Err(e) => {
                failures += 1;
                error!(tx = %hash, code = e.code(), error = %e, "Monitoring failed");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} transaction(s) did not succeed", failures, hashes.len());
    }
    Ok(())
}

// ============================================================
// DEMO
// ============================================================

#[cfg(feature = "mock-sdk")]
async fn run_demo(config: &AppConfig) -> anyhow::Result<()> {
    use rust_decimal::Decimal;
    use tokenpad::deploy::{DeployTokenRequest, MintRequest, TokenDeployer};
    use tokenpad::ledger::MockLedgerSdk;

    const DEMO_ADMIN: &str = "GDEMOADMINAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

    let sdk = Arc::new(MockLedgerSdk::new(config.ledger.mock_confirm_polls));
    let monitor = Arc::new(TransactionMonitor::new(sdk.clone(), config.monitor.clone())?);
    let mut deployer = TokenDeployer::new(sdk, monitor, config.ledger.token_factory_id.clone());
    if let Some(base) = &config.ledger.explorer_base_url {
        deployer = deployer.with_explorer(base.clone());
    }

    let deployed = deployer
        .deploy_token(&DeployTokenRequest {
            admin: DEMO_ADMIN.to_string(),
            name: "Demo Token".to_string(),
            symbol: "DEMO".to_string(),
            decimals: 7,
        })
        .await
        .context("deploying demo token")?;
    println!("{}", serde_json::to_string_pretty(&deployed)?);

    let minted = deployer
        .mint(&MintRequest {
            token: deployed.contract_id.clone(),
            to: DEMO_ADMIN.to_string(),
            amount: Decimal::new(1_000, 0),
        })
        .await
        .context("minting demo supply")?;
    println!("{}", serde_json::to_string_pretty(&minted)?);

    Ok(())
}

#[cfg(not(feature = "mock-sdk"))]
async fn run_demo(_config: &AppConfig) -> anyhow::Result<()> {
    anyhow::bail!("--demo requires the `mock-sdk` feature")
}
