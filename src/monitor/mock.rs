//! Scripted status provider for tests and demos.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use super::error::ProviderError;
use super::provider::StatusProvider;
use super::types::StatusReport;

/// Scripted provider for tests and demos.
///
/// Answers queries from a script in order; once the script is exhausted the
/// last entry repeats forever.
pub struct MockStatusProvider {
    script: Mutex<VecDeque<Result<StatusReport, ProviderError>>>,
    last: Mutex<Option<Result<StatusReport, ProviderError>>>,
    queries: AtomicU32,
}

impl MockStatusProvider {
    pub fn new(script: Vec<Result<StatusReport, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            queries: AtomicU32::new(0),
        }
    }

    /// Provider that never leaves pending.
    pub fn always_pending() -> Self {
        Self::new(vec![Ok(StatusReport::pending())])
    }

    /// Provider whose every query fails.
    pub fn always_failing(error: ProviderError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Number of `fetch_status` calls served so far.
    pub fn query_count(&self) -> u32 {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusProvider for MockStatusProvider {
    async fn fetch_status(&self, _identifier: &str) -> Result<StatusReport, ProviderError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let next = self.script.lock().expect("script poisoned").pop_front();
        let mut last = self.last.lock().expect("script poisoned");
        match next {
            Some(entry) => {
                *last = Some(entry.clone());
                entry
            }
            None => last
                .clone()
                .unwrap_or_else(|| Err(ProviderError::Unreachable("empty script".into()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::types::TxState;

    #[tokio::test]
    async fn test_mock_repeats_last_entry() {
        let provider = MockStatusProvider::new(vec![
            Err(ProviderError::Unreachable("down".into())),
            Ok(StatusReport::pending()),
        ]);

        assert!(provider.fetch_status("x").await.is_err());
        for _ in 0..3 {
            let report = provider.fetch_status("x").await.unwrap();
            assert_eq!(report.state, TxState::Pending);
        }
        assert_eq!(provider.query_count(), 4);
    }

    #[tokio::test]
    async fn test_empty_script_is_unreachable() {
        let provider = MockStatusProvider::new(vec![]);
        assert!(matches!(
            provider.fetch_status("x").await,
            Err(ProviderError::Unreachable(_))
        ));
    }
}
