use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

pub const DEFAULT_EXPLORER_URL: &str = "https://solscan.io/tx/";

// Validate Solana address
pub fn validate_solana_address(address: &str) -> bool {
    Pubkey::from_str(address).is_ok()
}

// Block explorer link for a transaction signature
pub fn explorer_url(base: &str, signature: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), signature)
}

// Shorten address for display
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }

    let start = &address[..5];
    let end = &address[address.len() - 5..];

    format!("{}...{}", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explorer_url_joins_without_double_slash() {
        assert_eq!(
            explorer_url(DEFAULT_EXPLORER_URL, "abc"),
            "https://solscan.io/tx/abc"
        );
        assert_eq!(explorer_url("https://x.io/tx", "abc"), "https://x.io/tx/abc");
    }

    #[test]
    fn shortens_long_addresses() {
        assert_eq!(
            shorten_address("So11111111111111111111111111111111111111112"),
            "So111...11112"
        );
        assert_eq!(shorten_address("short"), "short");
    }

    #[test]
    fn validates_addresses() {
        assert!(validate_solana_address("So11111111111111111111111111111111111111112"));
        assert!(!validate_solana_address("not-an-address"));
    }
}
