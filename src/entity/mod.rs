mod quote;
mod swap_error;
mod swap_stage;
mod token;
mod transaction;
mod transaction_history;

pub use quote::{Quote, QuoteSummary, HIGH_PRICE_IMPACT_PCT, QUOTE_EXPIRING_TICKS};
pub use swap_error::SwapError;
pub use swap_stage::SwapStage;
pub use token::{find_by_symbol, search_tokens, Token};
pub use transaction::{PendingTransaction, TransactionRecord, TxStatus};
pub use transaction_history::{TransactionHistory, MAX_RECENT_TRANSACTIONS};
