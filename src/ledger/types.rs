use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Argument of a contract call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InvocationArg {
    Address(String),
    String(String),
    U32(u32),
    /// Token amount in display units
    Amount(Decimal),
}

impl InvocationArg {
    pub fn as_address(&self) -> Option<&str> {
        match self {
            InvocationArg::Address(address) => Some(address),
            _ => None,
        }
    }
}

/// A prepared contract call, ready to simulate or submit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub contract_id: String,
    pub function: String,
    pub args: Vec<InvocationArg>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Minimum fee the network will charge, in native units
    pub min_fee: Decimal,
    pub return_value: Option<InvocationArg>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_serialization_is_tagged() {
        let json = serde_json::to_string(&InvocationArg::U32(7)).unwrap();
        assert_eq!(json, r#"{"type":"u32","value":7}"#);
    }

    #[test]
    fn test_as_address() {
        assert_eq!(
            InvocationArg::Address("GABC".into()).as_address(),
            Some("GABC")
        );
        assert_eq!(InvocationArg::U32(1).as_address(), None);
    }
}
