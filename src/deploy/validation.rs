//! Guard clauses run before anything reaches the SDK.

use rust_decimal::Decimal;

use super::error::DeployError;
use crate::ledger::LedgerSdk;

pub const MAX_SYMBOL_LEN: usize = 12;
pub const MAX_NAME_LEN: usize = 64;
pub const MAX_DECIMALS: u32 = 18;

/// Non-empty and well-formed per the SDK
pub fn validate_address(
    sdk: &dyn LedgerSdk,
    field: &'static str,
    address: &str,
) -> Result<(), DeployError> {
    let trimmed = address.trim();
    if trimmed.is_empty() || trimmed != address || !sdk.validate_address(address) {
        return Err(DeployError::InvalidAddress {
            field,
            value: address.to_string(),
        });
    }
    Ok(())
}

pub fn validate_amount(amount: Decimal) -> Result<(), DeployError> {
    if amount <= Decimal::ZERO {
        return Err(DeployError::InvalidAmount);
    }
    Ok(())
}

pub fn validate_token_metadata(name: &str, symbol: &str, decimals: u32) -> Result<(), DeployError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DeployError::InvalidTokenMetadata(
            "name must not be empty".into(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DeployError::InvalidTokenMetadata(format!(
            "name longer than {} characters",
            MAX_NAME_LEN
        )));
    }
    if symbol.is_empty()
        || symbol.len() > MAX_SYMBOL_LEN
        || !symbol.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(DeployError::InvalidTokenMetadata(format!(
            "symbol must be 1-{} ASCII letters or digits, got {:?}",
            MAX_SYMBOL_LEN, symbol
        )));
    }
    if decimals > MAX_DECIMALS {
        return Err(DeployError::InvalidTokenMetadata(format!(
            "decimals must be <= {}, got {}",
            MAX_DECIMALS, decimals
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MockLedgerSdk;

    #[test]
    fn test_amount_must_be_positive() {
        assert!(validate_amount(Decimal::new(1, 7)).is_ok());
        assert_eq!(validate_amount(Decimal::ZERO), Err(DeployError::InvalidAmount));
        assert_eq!(
            validate_amount(Decimal::new(-5, 0)),
            Err(DeployError::InvalidAmount)
        );
    }

    #[test]
    fn test_address_guards() {
        let sdk = MockLedgerSdk::new(0);
        let good = format!("G{}", "B".repeat(55));
        assert!(validate_address(&sdk, "to", &good).is_ok());

        for bad in ["", "   ", "GSHORT"] {
            let err = validate_address(&sdk, "to", bad).unwrap_err();
            assert_eq!(err.code(), "INVALID_ADDRESS");
        }
        assert!(validate_address(&sdk, "to", &format!(" {}", good)).is_err());
    }

    #[test]
    fn test_token_metadata_guards() {
        assert!(validate_token_metadata("Demo Token", "DEMO", 7).is_ok());
        assert!(validate_token_metadata("", "DEMO", 7).is_err());
        assert!(validate_token_metadata("  ", "DEMO", 7).is_err());
        assert!(validate_token_metadata("Demo", "", 7).is_err());
        assert!(validate_token_metadata("Demo", "TOOLONGSYMBOL", 7).is_err());
        assert!(validate_token_metadata("Demo", "DE-MO", 7).is_err());
        assert!(validate_token_metadata("Demo", "DEMO", 19).is_err());
        assert!(validate_token_metadata(&"x".repeat(65), "DEMO", 7).is_err());
    }
}
