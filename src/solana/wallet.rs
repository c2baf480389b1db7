use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::info;
use solana_sdk::{signature::Keypair, signer::Signer, transaction::VersionedTransaction};
use std::sync::atomic::{AtomicBool, Ordering};

/// Connected wallet as seen by the swap flow
#[async_trait]
pub trait WalletProvider: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Base58 account address, `None` while disconnected
    fn public_key(&self) -> Option<String>;

    async fn connect(&self) -> Result<String>;

    async fn disconnect(&self) -> Result<()>;

    /// Sign a transaction. Fails when the wallet declines or is disconnected.
    async fn sign_transaction(&self, transaction: VersionedTransaction)
        -> Result<VersionedTransaction>;
}

/// Software wallet holding a local keypair
pub struct KeypairWallet {
    keypair: Option<Keypair>,
    connected: AtomicBool,
}

impl KeypairWallet {
    pub fn new(keypair: Option<Keypair>) -> Self {
        Self {
            keypair,
            connected: AtomicBool::new(false),
        }
    }

    /// Build from an optional base58 keypair as found in configuration
    pub fn from_base58(keypair_base58: Option<&str>) -> Result<Self> {
        let keypair = keypair_base58
            .filter(|s| !s.trim().is_empty())
            .map(keypair_from_base58)
            .transpose()?;
        Ok(Self::new(keypair))
    }
}

#[async_trait]
impl WalletProvider for KeypairWallet {
    fn is_connected(&self) -> bool {
        self.keypair.is_some() && self.connected.load(Ordering::SeqCst)
    }

    fn public_key(&self) -> Option<String> {
        if !self.is_connected() {
            return None;
        }
        self.keypair.as_ref().map(|k| k.pubkey().to_string())
    }

    async fn connect(&self) -> Result<String> {
        let keypair = self
            .keypair
            .as_ref()
            .ok_or_else(|| anyhow!("No wallet keypair configured"))?;

        self.connected.store(true, Ordering::SeqCst);
        let address = keypair.pubkey().to_string();
        info!("Wallet connected: {}", address);

        Ok(address)
    }

    async fn disconnect(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        info!("Wallet disconnected");
        Ok(())
    }

    async fn sign_transaction(
        &self,
        transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction> {
        if !self.is_connected() {
            return Err(anyhow!("Wallet not connected"));
        }

        let keypair = self
            .keypair
            .as_ref()
            .ok_or_else(|| anyhow!("No wallet keypair configured"))?;

        VersionedTransaction::try_new(transaction.message, &[keypair])
            .map_err(|e| anyhow!("Failed to sign transaction: {}", e))
    }
}

/// Serialize Keypair (64 bytes) to base58.
pub fn keypair_to_base58(keypair: &Keypair) -> String {
    bs58::encode(keypair.to_bytes()).into_string()
}

/// Restore Keypair from base58 string (64 bytes).
pub fn keypair_from_base58(keypair_base58: &str) -> Result<Keypair> {
    let keypair_bytes = bs58::decode(keypair_base58.trim())
        .into_vec()
        .map_err(|e| anyhow!("Failed to decode base58 keypair: {}", e))?;

    if keypair_bytes.len() != 64 {
        return Err(anyhow!("Invalid keypair length: {}", keypair_bytes.len()));
    }

    let keypair = Keypair::from_bytes(&keypair_bytes)
        .map_err(|e| anyhow!("Failed to create keypair from bytes: {}", e))?;

    Ok(keypair)
}
