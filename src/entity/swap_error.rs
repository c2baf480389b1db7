#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("Failed to load token list: {0}")]
    TokenList(String),

    #[error("{0}")]
    Quote(String),

    #[error("Failed to prepare swap: {0}")]
    Build(String),

    #[error("Failed to deserialize transaction: {0}")]
    Deserialize(String),

    #[error("Transaction was not approved: {0}")]
    SignRejected(String),

    #[error("Failed to send transaction: {0}")]
    Broadcast(String),

    #[error("Transaction {signature} failed to confirm: {reason}")]
    ConfirmationFailed { signature: String, reason: String },

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Swap unavailable: {0}")]
    SwapUnavailable(String),

    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
