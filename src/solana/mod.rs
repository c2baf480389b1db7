pub mod client;
pub mod jupiter;
pub mod transaction;
pub mod utils;
pub mod wallet;

// Re-export commonly used items
pub use client::{create_solana_client, Confirmation, NetworkProvider, RpcNetwork};
pub use transaction::{decode_transaction, TransactionFormat};
pub use utils::{display_raw_amount, parse_amount, to_smallest_units};
pub use wallet::{keypair_from_base58, KeypairWallet, WalletProvider};
