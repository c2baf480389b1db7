use anyhow::{Context, Result};
use log::info;
use reqwest::Client;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::interactor::{SwapInteractorImpl, SwapState};
use crate::presenter::SwapPresenterImpl;
use crate::solana::client::{create_solana_client, NetworkProvider, RpcNetwork};
use crate::solana::jupiter::quote_service::{JupiterQuoteService, QuoteService};
use crate::solana::jupiter::swap_service::{JupiterSwapService, SwapService};
use crate::solana::jupiter::token_repository::{JupiterTokenRepository, TokenRepository};
use crate::solana::wallet::{KeypairWallet, WalletProvider};
use crate::view::SwapView;

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    config: AppConfig,

    // Jupiter services
    token_repository: Arc<dyn TokenRepository>,
    quote_service: Arc<dyn QuoteService>,
    swap_service: Arc<dyn SwapService>,

    // Chain access
    wallet: Arc<dyn WalletProvider>,
    network: Arc<dyn NetworkProvider>,
}

impl ServiceContainer {
    /// Wire every service from configuration. Nothing touches the network here.
    pub fn new(config: AppConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        let jupiter_config = config.jupiter();

        let token_repository = Arc::new(JupiterTokenRepository::new(
            http_client.clone(),
            jupiter_config.clone(),
        )) as Arc<dyn TokenRepository>;

        let quote_service = Arc::new(JupiterQuoteService::new(
            http_client.clone(),
            jupiter_config.clone(),
        )) as Arc<dyn QuoteService>;

        let swap_service =
            Arc::new(JupiterSwapService::new(http_client, jupiter_config)) as Arc<dyn SwapService>;

        let solana_client =
            create_solana_client(&config.rpc_url).context("Failed to create Solana client")?;
        let network = Arc::new(RpcNetwork::new(
            solana_client,
            config.confirm_poll_interval(),
            config.confirm_max_attempts,
        )) as Arc<dyn NetworkProvider>;

        let wallet = Arc::new(
            KeypairWallet::from_base58(config.wallet_keypair.as_deref())
                .context("Invalid SWAP_WALLET_KEYPAIR")?,
        ) as Arc<dyn WalletProvider>;

        info!(
            "Services configured (quote API {}, RPC {})",
            config.quote_api_url, config.rpc_url
        );

        Ok(Self {
            config,
            token_repository,
            quote_service,
            swap_service,
            wallet,
            network,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn wallet(&self) -> Arc<dyn WalletProvider> {
        self.wallet.clone()
    }

    pub fn swap_interactor(&self) -> Arc<SwapInteractorImpl> {
        Arc::new(SwapInteractorImpl::new(
            self.token_repository.clone(),
            self.quote_service.clone(),
            self.swap_service.clone(),
            self.wallet.clone(),
            self.network.clone(),
            self.config.swap_options(),
        ))
    }

    pub fn swap_state(&self) -> SwapState {
        SwapState::new(
            self.config.slippage_bps,
            self.config.quote_refresh_ticks,
            self.config.history_capacity,
        )
    }

    pub fn swap_presenter<V: SwapView>(
        &self,
        view: Arc<V>,
    ) -> Arc<SwapPresenterImpl<SwapInteractorImpl, V>> {
        Arc::new(SwapPresenterImpl::new(
            self.swap_interactor(),
            view,
            self.swap_state(),
            &self.config.explorer_url,
        ))
    }
}
