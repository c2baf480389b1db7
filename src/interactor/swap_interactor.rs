use crate::entity::{PendingTransaction, Quote, SwapError, Token};
use crate::solana::client::NetworkProvider;
use crate::solana::jupiter::models::{QuoteParams, QuoteResponse, SwapOptions};
use crate::solana::jupiter::quote_service::QuoteService;
use crate::solana::jupiter::swap_service::SwapService;
use crate::solana::jupiter::token_repository::TokenRepository;
use crate::solana::transaction::decode_transaction;
use crate::solana::wallet::WalletProvider;
use async_trait::async_trait;
use log::{debug, info, warn};
use solana_sdk::transaction::VersionedTransaction;
use std::sync::Arc;

/// One call per swap stage, each failing with its own `SwapError` variant
#[async_trait]
pub trait SwapInteractor: Send + Sync {
    async fn load_tokens(&self) -> Result<Vec<Token>, SwapError>;

    async fn fetch_quote(&self, params: &QuoteParams) -> Result<QuoteResponse, SwapError>;

    fn is_wallet_connected(&self) -> bool;

    fn wallet_public_key(&self) -> Option<String>;

    async fn connect_wallet(&self) -> Result<String, SwapError>;

    async fn disconnect_wallet(&self) -> Result<(), SwapError>;

    async fn prepare_swap(
        &self,
        quote: &Quote,
        user_public_key: &str,
    ) -> Result<PendingTransaction, SwapError>;

    async fn sign_swap(
        &self,
        pending: &PendingTransaction,
    ) -> Result<VersionedTransaction, SwapError>;

    async fn send_swap(&self, transaction: &VersionedTransaction) -> Result<String, SwapError>;

    async fn confirm_swap(&self, signature: &str) -> Result<(), SwapError>;
}

pub struct SwapInteractorImpl {
    token_repository: Arc<dyn TokenRepository>,
    quote_service: Arc<dyn QuoteService>,
    swap_service: Arc<dyn SwapService>,
    wallet: Arc<dyn WalletProvider>,
    network: Arc<dyn NetworkProvider>,
    swap_options: SwapOptions,
}

impl SwapInteractorImpl {
    pub fn new(
        token_repository: Arc<dyn TokenRepository>,
        quote_service: Arc<dyn QuoteService>,
        swap_service: Arc<dyn SwapService>,
        wallet: Arc<dyn WalletProvider>,
        network: Arc<dyn NetworkProvider>,
        swap_options: SwapOptions,
    ) -> Self {
        Self {
            token_repository,
            quote_service,
            swap_service,
            wallet,
            network,
            swap_options,
        }
    }
}

#[async_trait]
impl SwapInteractor for SwapInteractorImpl {
    async fn load_tokens(&self) -> Result<Vec<Token>, SwapError> {
        self.token_repository
            .get_token_list()
            .await
            .map_err(|e| SwapError::TokenList(e.to_string()))
    }

    async fn fetch_quote(&self, params: &QuoteParams) -> Result<QuoteResponse, SwapError> {
        self.quote_service.get_quote(params).await.map_err(|e| {
            warn!("Quote error: {}", e);
            SwapError::Quote(e.to_string())
        })
    }

    fn is_wallet_connected(&self) -> bool {
        self.wallet.is_connected()
    }

    fn wallet_public_key(&self) -> Option<String> {
        self.wallet.public_key()
    }

    async fn connect_wallet(&self) -> Result<String, SwapError> {
        self.wallet
            .connect()
            .await
            .map_err(|e| SwapError::SwapUnavailable(e.to_string()))
    }

    async fn disconnect_wallet(&self) -> Result<(), SwapError> {
        self.wallet
            .disconnect()
            .await
            .map_err(|e| SwapError::SwapUnavailable(e.to_string()))
    }

    async fn prepare_swap(
        &self,
        quote: &Quote,
        user_public_key: &str,
    ) -> Result<PendingTransaction, SwapError> {
        debug!(
            "Building swap of {} {} to {} for {}",
            quote.amount.trim(),
            quote.input_token.symbol,
            quote.output_token.symbol,
            user_public_key
        );

        let transaction = self
            .swap_service
            .build_swap(&quote.response, user_public_key, &self.swap_options)
            .await
            .map_err(|e| SwapError::Build(e.to_string()))?;

        Ok(PendingTransaction {
            payload: transaction.payload,
            last_valid_block_height: transaction.last_valid_block_height,
            input_token: quote.input_token.clone(),
            output_token: quote.output_token.clone(),
            amount: quote.amount.clone(),
        })
    }

    async fn sign_swap(
        &self,
        pending: &PendingTransaction,
    ) -> Result<VersionedTransaction, SwapError> {
        let (format, transaction) = decode_transaction(&pending.payload)
            .map_err(|e| SwapError::Deserialize(e.to_string()))?;
        debug!(
            "Swap transaction format: {:?}, valid until block height {}",
            format, pending.last_valid_block_height
        );

        self.wallet
            .sign_transaction(transaction)
            .await
            .map_err(|e| SwapError::SignRejected(e.to_string()))
    }

    async fn send_swap(&self, transaction: &VersionedTransaction) -> Result<String, SwapError> {
        let signature = self
            .network
            .broadcast(transaction)
            .await
            .map_err(|e| SwapError::Broadcast(e.to_string()))?;

        info!("Swap transaction broadcast: {}", signature);
        Ok(signature)
    }

    async fn confirm_swap(&self, signature: &str) -> Result<(), SwapError> {
        let confirmation =
            self.network
                .confirm(signature)
                .await
                .map_err(|e| SwapError::ConfirmationFailed {
                    signature: signature.to_string(),
                    reason: e.to_string(),
                })?;

        if confirmation.success {
            info!("Swap transaction confirmed: {}", signature);
            Ok(())
        } else {
            Err(SwapError::ConfirmationFailed {
                signature: signature.to_string(),
                reason: confirmation
                    .error
                    .unwrap_or_else(|| "Transaction failed to confirm".to_string()),
            })
        }
    }
}
