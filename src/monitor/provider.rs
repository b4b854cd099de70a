use async_trait::async_trait;

use super::error::ProviderError;
use super::types::StatusReport;

/// Source of truth for the current state of a submitted transaction.
#[async_trait]
pub trait StatusProvider: Send + Sync {
    /// Fetch the current status for `identifier`.
    async fn fetch_status(&self, identifier: &str) -> Result<StatusReport, ProviderError>;

    /// Reject identifiers this provider can never resolve.
    fn validate_identifier(&self, identifier: &str) -> bool {
        is_well_formed_identifier(identifier)
    }
}

/// Non-empty and free of whitespace and control characters.
pub fn is_well_formed_identifier(identifier: &str) -> bool {
    !identifier.is_empty()
        && !identifier
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
}
