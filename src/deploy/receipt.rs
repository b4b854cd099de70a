use rust_decimal::Decimal;
use serde::Serialize;

/// What a successful deploy or mint hands back to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentReceipt {
    pub tx_hash: String,
    pub fee: Option<Decimal>,
    /// Token contract the transaction targeted or created
    pub contract_id: String,
    pub explorer_url: Option<String>,
}

impl DeploymentReceipt {
    /// One-line summary for logs and success banners
    pub fn summary(&self) -> String {
        let fee = self
            .fee
            .map(|f| f.normalize().to_string())
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "contract {} tx {} fee {}",
            short_id(&self.contract_id),
            short_id(&self.tx_hash),
            fee
        )
    }
}

pub fn explorer_url(base: &str, tx_hash: &str) -> String {
    format!("{}/tx/{}", base.trim_end_matches('/'), tx_hash)
}

/// `ABCDEF…UVWXYZ` for ids longer than 12 characters
pub fn short_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= 12 {
        return id.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{}…{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explorer_url_trims_slash() {
        assert_eq!(
            explorer_url("https://explorer.example/testnet/", "abc"),
            "https://explorer.example/testnet/tx/abc"
        );
        assert_eq!(explorer_url("http://x", "abc"), "http://x/tx/abc");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("short"), "short");
        assert_eq!(short_id("0123456789abcdef"), "012345…abcdef");
    }

    #[test]
    fn test_summary() {
        let receipt = DeploymentReceipt {
            tx_hash: "a".repeat(64),
            fee: Some(Decimal::new(2500, 7)),
            contract_id: format!("C{}", "B".repeat(55)),
            explorer_url: None,
        };
        assert_eq!(
            receipt.summary(),
            "contract CBBBBB…BBBBBB tx aaaaaa…aaaaaa fee 0.00025"
        );
    }
}
