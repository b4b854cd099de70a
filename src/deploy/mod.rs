//! Token deployment flows
//!
//! Single-shot SDK round trips guarded by input validation:
//! validate → build → simulate → submit → monitor → receipt.

pub mod error;
pub mod receipt;
pub mod service;
pub mod validation;

pub use error::DeployError;
pub use receipt::{DeploymentReceipt, explorer_url, short_id};
pub use service::{DeployTokenRequest, MintRequest, TokenDeployer};
