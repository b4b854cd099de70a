use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SdkError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Simulation failed: {0}")]
    Simulation(String),
    #[error("Submission rejected: {0}")]
    Rejected(String),
}
