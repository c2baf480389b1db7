use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;
use solana_transaction_status::TransactionStatus;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of waiting for a broadcast transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub success: bool,
    pub error: Option<String>,
}

/// Network access used by the swap flow
#[async_trait]
pub trait NetworkProvider: Send + Sync {
    /// Submit a signed transaction, returning its signature
    async fn broadcast(&self, transaction: &VersionedTransaction) -> Result<String>;

    /// Wait until the transaction lands. `Err` if it never reaches confirmation.
    async fn confirm(&self, signature: &str) -> Result<Confirmation>;
}

/// Create a Solana client with confirmed commitment
pub fn create_solana_client(rpc_url: &str) -> Result<Arc<RpcClient>> {
    let client = RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed());

    Ok(Arc::new(client))
}

/// `NetworkProvider` over a Solana JSON-RPC node
pub struct RpcNetwork {
    client: Arc<RpcClient>,
    poll_interval: Duration,
    max_attempts: u32,
}

impl RpcNetwork {
    pub fn new(client: Arc<RpcClient>, poll_interval: Duration, max_attempts: u32) -> Self {
        Self {
            client,
            poll_interval,
            max_attempts: max_attempts.max(1),
        }
    }
}

fn send_config() -> RpcSendTransactionConfig {
    RpcSendTransactionConfig {
        skip_preflight: false,
        preflight_commitment: Some(CommitmentLevel::Confirmed),
        max_retries: Some(3),
        ..RpcSendTransactionConfig::default()
    }
}

/// A status counts once it reaches `confirmed`; its error decides the outcome
fn confirmation_from_status(status: &TransactionStatus) -> Option<Confirmation> {
    if !status.satisfies_commitment(CommitmentConfig::confirmed()) {
        return None;
    }

    Some(Confirmation {
        success: status.err.is_none(),
        error: status.err.as_ref().map(|e| e.to_string()),
    })
}

#[async_trait]
impl NetworkProvider for RpcNetwork {
    async fn broadcast(&self, transaction: &VersionedTransaction) -> Result<String> {
        info!("Calling network");

        let signature = self
            .client
            .send_transaction_with_config(transaction, send_config())
            .await
            .map_err(|e| anyhow!("Failed to send transaction: {}", e))?;

        info!("Transaction sent: {}", signature);

        Ok(signature.to_string())
    }

    async fn confirm(&self, signature: &str) -> Result<Confirmation> {
        let parsed = Signature::from_str(signature)
            .map_err(|e| anyhow!("Invalid transaction signature {}: {}", signature, e))?;

        for attempt in 1..=self.max_attempts {
            let statuses = self
                .client
                .get_signature_statuses(&[parsed])
                .await
                .map_err(|e| anyhow!("Failed to fetch signature status: {}", e))?;

            if let Some(confirmation) = statuses
                .value
                .into_iter()
                .next()
                .flatten()
                .as_ref()
                .and_then(confirmation_from_status)
            {
                debug!(
                    "Signature {} settled after {} attempt(s): {:?}",
                    signature, attempt, confirmation
                );
                return Ok(confirmation);
            }

            tokio::time::sleep(self.poll_interval).await;
        }

        Err(anyhow!(
            "Transaction {} was not confirmed after {} attempts",
            signature,
            self.max_attempts
        ))
    }
}
