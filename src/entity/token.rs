use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub address: String,          // Token mint address
    pub symbol: String,           // Token symbol (e.g. "SOL", "USDC")
    pub name: String,             // Full token name
    pub decimals: u8,             // Number of decimal places
    pub logo_uri: Option<String>, // Token logo URI
}

impl Token {
    /// Case-insensitive prefix match on symbol or name, used by the token selector
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        self.symbol.to_lowercase().starts_with(&query)
            || self.name.to_lowercase().starts_with(&query)
    }
}

/// Filter a token list for the selector, exact symbol matches first
pub fn search_tokens<'a>(tokens: &'a [Token], query: &str) -> Vec<&'a Token> {
    let mut found: Vec<&Token> = tokens.iter().filter(|t| t.matches(query)).collect();
    let query = query.trim();
    found.sort_by_key(|t| !t.symbol.eq_ignore_ascii_case(query));
    found
}

/// Find a token by its symbol, ignoring case
pub fn find_by_symbol<'a>(tokens: &'a [Token], symbol: &str) -> Option<&'a Token> {
    tokens
        .iter()
        .find(|t| t.symbol.eq_ignore_ascii_case(symbol.trim()))
}
