//! Transaction Monitor - polling loop
//!
//! Repeatedly queries a [`StatusProvider`] until the transaction reaches a
//! terminal state, the deadline passes, or the caller cancels:
//!
//! ```text
//! query ──▶ terminal? ──yes──▶ progress(final) ──▶ Completed
//!   ▲           │no
//!   │           ▼
//!   │     progress(pending) ──▶ deadline? ──yes──▶ MonitoringTimeout
//!   │           │no
//!   └── backoff ◀┘
//! ```
//!
//! Provider failures never abort a session; they are observed as pending and
//! collapse into `MonitoringTimeout` if they persist.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::cancel::CancelSignal;
use super::error::MonitorError;
use super::policy::PollingPolicy;
use super::provider::StatusProvider;
use super::types::{MonitorOutcome, TransactionStatus, TxState};
use crate::clock::{Clock, TokioClock};

/// Monitors submitted transactions until they settle.
///
/// One instance can drive any number of concurrent sessions; each call to
/// a `monitor*` method owns its own deadline, interval and counters.
pub struct TransactionMonitor {
    provider: Arc<dyn StatusProvider>,
    clock: Arc<dyn Clock>,
    policy: PollingPolicy,
}

impl TransactionMonitor {
    /// Create a monitor on the tokio clock
    pub fn new(
        provider: Arc<dyn StatusProvider>,
        policy: PollingPolicy,
    ) -> Result<Self, MonitorError> {
        Self::with_clock(provider, policy, Arc::new(TokioClock::new()))
    }

    pub fn with_clock(
        provider: Arc<dyn StatusProvider>,
        policy: PollingPolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, MonitorError> {
        policy.validate()?;
        Ok(Self {
            provider,
            clock,
            policy,
        })
    }

    pub fn policy(&self) -> &PollingPolicy {
        &self.policy
    }

    /// Poll until `identifier` is terminal or the timeout elapses.
    pub async fn monitor(&self, identifier: &str) -> Result<TransactionStatus, MonitorError> {
        self.monitor_with_progress(identifier, |_| Ok(())).await
    }

    /// Like [`monitor`](Self::monitor), reporting every observation to `on_progress`.
    pub async fn monitor_with_progress<F>(
        &self,
        identifier: &str,
        mut on_progress: F,
    ) -> Result<TransactionStatus, MonitorError>
    where
        F: FnMut(&TransactionStatus) -> anyhow::Result<()> + Send,
    {
        match self.run(identifier, &mut on_progress, None).await? {
            MonitorOutcome::Completed(status) => Ok(status),
            MonitorOutcome::Cancelled => Err(MonitorError::Cancelled(identifier.to_string())),
        }
    }

    /// Poll with cooperative cancellation. A cancelled session settles as
    /// [`MonitorOutcome::Cancelled`] and makes no further progress calls.
    pub async fn monitor_cancellable<F>(
        &self,
        identifier: &str,
        mut on_progress: F,
        cancel: &CancelSignal,
    ) -> Result<MonitorOutcome, MonitorError>
    where
        F: FnMut(&TransactionStatus) -> anyhow::Result<()> + Send,
    {
        self.run(identifier, &mut on_progress, Some(cancel)).await
    }

    #[instrument(skip_all, fields(tx = %identifier))]
    async fn run(
        &self,
        identifier: &str,
        on_progress: &mut (dyn FnMut(&TransactionStatus) -> anyhow::Result<()> + Send),
        cancel: Option<&CancelSignal>,
    ) -> Result<MonitorOutcome, MonitorError> {
        if !self.provider.validate_identifier(identifier) {
            return Err(MonitorError::InvalidIdentifier(identifier.to_string()));
        }

        let started = self.clock.elapsed();
        let deadline = started + self.policy.timeout();
        let mut backoff = self.policy.backoff();
        let mut attempts: u32 = 0;
        let mut failed_attempts: u32 = 0;
        let mut last_state = TxState::Pending;

        debug!(
            timeout_ms = self.policy.timeout_ms,
            initial_interval_ms = self.policy.initial_interval_ms,
            "Starting transaction monitoring"
        );

        loop {
            // a. query (suspension point)
            let query = self.provider.fetch_status(identifier);
            let result = match cancel {
                Some(signal) => {
                    tokio::select! {
                        biased;
                        _ = signal.cancelled() => return Ok(self.cancelled(attempts)),
                        result = query => result,
                    }
                }
                None => query.await,
            };
            attempts += 1;

            // b. transient failures are observed as pending
            let status = match result {
                Ok(report) => {
                    TransactionStatus::from_report(identifier, report, self.clock.wall_time())
                }
                Err(e) => {
                    failed_attempts += 1;
                    warn!(attempt = attempts, error = %e, "Status query failed, will retry");
                    TransactionStatus::pending(identifier, self.clock.wall_time())
                }
            };

            debug_assert!(
                last_state.can_transition_to(status.state),
                "illegal transition {} -> {}",
                last_state,
                status.state
            );
            last_state = status.state;

            // c. terminal: report and return
            if status.is_terminal() {
                notify(on_progress, &status);
                info!(
                    state = %status.state,
                    fee = ?status.fee,
                    attempts,
                    elapsed_ms = (self.clock.elapsed() - started).as_millis() as u64,
                    "Transaction settled"
                );
                return Ok(MonitorOutcome::Completed(status));
            }

            // d. pending
            notify(on_progress, &status);

            // e. deadline
            let now = self.clock.elapsed();
            if now >= deadline {
                let elapsed = now - started;
                warn!(
                    attempts,
                    failed_attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Transaction monitoring timed out"
                );
                return Err(MonitorError::MonitoringTimeout {
                    identifier: identifier.to_string(),
                    elapsed,
                    attempts,
                    failed_attempts,
                });
            }

            // f/g. wait (suspension point), never sleeping past the deadline
            let interval = backoff.next().unwrap_or(self.policy.max_interval());
            let wait = interval.min(deadline - now);
            debug!(
                attempt = attempts,
                wait_ms = wait.as_millis() as u64,
                "Transaction still pending"
            );
            match cancel {
                Some(signal) => {
                    tokio::select! {
                        biased;
                        _ = signal.cancelled() => return Ok(self.cancelled(attempts)),
                        _ = self.clock.sleep(wait) => {}
                    }
                }
                None => self.clock.sleep(wait).await,
            }
        }
    }

    fn cancelled(&self, attempts: u32) -> MonitorOutcome {
        info!(attempts, "Transaction monitoring cancelled");
        MonitorOutcome::Cancelled
    }
}

/// Deliver an observation; callback errors are logged and ignored.
fn notify(
    on_progress: &mut (dyn FnMut(&TransactionStatus) -> anyhow::Result<()> + Send),
    status: &TransactionStatus,
) {
    if let Err(e) = on_progress(status) {
        warn!(state = %status.state, error = %e, "Progress callback failed (ignored)");
    }
}
