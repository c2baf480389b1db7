pub const DEFAULT_QUOTE_API_URL: &str = "https://quote-api.jup.ag/v6";
pub const DEFAULT_TOKEN_LIST_URL: &str = "https://token.jup.ag/strict";
pub const DEFAULT_SLIPPAGE_BPS: u16 = 50;

/// Jupiter API endpoints
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for quote and swap endpoints
    pub quote_api_url: String,

    /// URL serving the tradable token list
    pub token_list_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quote_api_url: DEFAULT_QUOTE_API_URL.to_string(),
            token_list_url: DEFAULT_TOKEN_LIST_URL.to_string(),
        }
    }
}

impl Config {
    pub fn quote_url(&self) -> String {
        format!("{}/quote", self.quote_api_url.trim_end_matches('/'))
    }

    pub fn swap_url(&self) -> String {
        format!("{}/swap", self.quote_api_url.trim_end_matches('/'))
    }
}
