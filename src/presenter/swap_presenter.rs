use crate::entity::{
    find_by_symbol, search_tokens, Quote, QuoteSummary, SwapError, SwapStage, Token,
    TransactionRecord, TxStatus,
};
use crate::interactor::swap_interactor::SwapInteractor;
use crate::interactor::swap_state::{Effect, SwapEvent, SwapPhase, SwapState};
use crate::solana::utils::parse_amount;
use crate::utils::{explorer_url, validate_solana_address};
use crate::view::swap_view::{NotificationId, SwapView};
use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Read-only copy of the widget state
#[derive(Debug, Clone, PartialEq)]
pub struct SwapSnapshot {
    pub phase: SwapPhase,
    pub input_token: Option<Token>,
    pub output_token: Option<Token>,
    pub amount: String,
    pub quote: Option<QuoteSummary>,
    pub countdown: u32,
    pub last_error: Option<String>,
    pub history: Vec<TransactionRecord>,
    pub wallet_connected: bool,
}

#[async_trait]
pub trait SwapPresenter: Send + Sync {
    async fn load_tokens(&self) -> Result<(), SwapError>;

    /// Store the typed amount and requote. `InvalidAmount` flags text that is not a positive number.
    async fn set_amount(&self, amount: &str) -> Result<(), SwapError>;

    /// Select by symbol or mint address
    async fn select_input_token(&self, query: &str) -> Result<Token, SwapError>;

    async fn select_output_token(&self, query: &str) -> Result<Token, SwapError>;

    async fn switch_tokens(&self);

    /// One countdown second
    async fn tick(&self);

    async fn execute_swap(&self) -> Result<TransactionRecord, SwapError>;

    async fn connect_wallet(&self) -> Result<String, SwapError>;

    async fn disconnect_wallet(&self) -> Result<(), SwapError>;

    async fn show_tokens(&self, query: &str) -> Result<()>;

    async fn show_quote(&self) -> Result<()>;

    async fn show_history(&self) -> Result<()>;

    async fn snapshot(&self) -> SwapSnapshot;
}

pub struct SwapPresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
    state: Mutex<SwapState>,
    explorer_base: String,
}

impl<I, V> SwapPresenterImpl<I, V>
where
    I: SwapInteractor,
    V: SwapView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>, state: SwapState, explorer_base: &str) -> Self {
        Self {
            interactor,
            view,
            state: Mutex::new(state),
            explorer_base: explorer_base.to_string(),
        }
    }

    /// Apply an event and carry out whatever it asks for. The state lock is
    /// never held across a network call.
    async fn dispatch(&self, event: SwapEvent) {
        let mut effect = self.state.lock().await.apply(event);

        loop {
            match effect {
                Effect::FetchQuote(request) => {
                    let result = self
                        .interactor
                        .fetch_quote(&request.params)
                        .await
                        .map_err(|e| e.to_string());
                    effect = self.state.lock().await.apply(SwapEvent::QuoteResolved {
                        seq: request.seq,
                        result,
                    });
                }
                Effect::QuoteUpdated(summary) => {
                    if let Err(e) = self.view.display_quote(&summary).await {
                        warn!("Failed to display quote: {}", e);
                    }
                    break;
                }
                Effect::QuoteFailed(message) => {
                    if let Err(e) = self.view.display_quote_error(&message).await {
                        warn!("Failed to display quote error: {}", e);
                    }
                    break;
                }
                Effect::Discarded => {
                    debug!("Quote response superseded");
                    break;
                }
                Effect::None => break,
            }
        }
    }

    async fn lookup_token(&self, query: &str) -> Result<Token, SwapError> {
        let query = query.trim();
        let state = self.state.lock().await;

        let found = if validate_solana_address(query) {
            state.tokens().iter().find(|t| t.address == query)
        } else {
            find_by_symbol(state.tokens(), query)
        };

        found
            .cloned()
            .ok_or_else(|| SwapError::UnknownToken(query.to_string()))
    }

    // Replace the visible progress message with the next stage's
    async fn advance(&self, progress: &mut Option<NotificationId>, stage: SwapStage) {
        if let Some(id) = progress.take() {
            self.dismiss(id).await;
        }

        info!("{}", stage);
        match self.view.display_progress(stage).await {
            Ok(id) => *progress = Some(id),
            Err(e) => warn!("Failed to display progress: {}", e),
        }
    }

    async fn dismiss(&self, id: NotificationId) {
        if let Err(e) = self.view.dismiss(id).await {
            warn!("Failed to dismiss notification {}: {}", id, e);
        }
    }

    async fn run_swap(
        &self,
        quote: &Quote,
        user_public_key: &str,
        progress: &mut Option<NotificationId>,
    ) -> Result<TransactionRecord, SwapError> {
        self.advance(progress, SwapStage::Preparing).await;
        let pending = self.interactor.prepare_swap(quote, user_public_key).await?;

        self.advance(progress, SwapStage::AwaitingApproval).await;
        let signed = self.interactor.sign_swap(&pending).await?;

        self.advance(progress, SwapStage::Sending).await;
        let signature = self.interactor.send_swap(&signed).await?;

        let mut record =
            TransactionRecord::pending(signature.clone(), &pending, quote.minimum_received());
        self.state
            .lock()
            .await
            .apply(SwapEvent::TransactionSent(record.clone()));

        self.advance(progress, SwapStage::Confirming).await;
        let confirmation = self.interactor.confirm_swap(&signature).await;

        let status = if confirmation.is_ok() {
            TxStatus::Success
        } else {
            TxStatus::Error
        };
        self.state
            .lock()
            .await
            .apply(SwapEvent::TransactionSettled { signature, status });

        confirmation?;
        record.settle(status);
        Ok(record)
    }
}

#[async_trait]
impl<I, V> SwapPresenter for SwapPresenterImpl<I, V>
where
    I: SwapInteractor + Send + Sync,
    V: SwapView + Send + Sync,
{
    async fn load_tokens(&self) -> Result<(), SwapError> {
        match self.interactor.load_tokens().await {
            Ok(tokens) => {
                info!("Loaded {} tokens", tokens.len());
                self.dispatch(SwapEvent::TokensLoaded(tokens)).await;
                Ok(())
            }
            Err(e) => {
                warn!("{}", e);
                self.dispatch(SwapEvent::TokensFailed(e.to_string())).await;
                Err(e)
            }
        }
    }

    async fn set_amount(&self, amount: &str) -> Result<(), SwapError> {
        self.dispatch(SwapEvent::AmountChanged(amount.to_string()))
            .await;

        if !amount.trim().is_empty() && parse_amount(amount).is_none() {
            return Err(SwapError::InvalidAmount);
        }
        Ok(())
    }

    async fn select_input_token(&self, query: &str) -> Result<Token, SwapError> {
        let token = self.lookup_token(query).await?;
        self.dispatch(SwapEvent::InputTokenSelected(token.clone()))
            .await;
        Ok(token)
    }

    async fn select_output_token(&self, query: &str) -> Result<Token, SwapError> {
        let token = self.lookup_token(query).await?;
        self.dispatch(SwapEvent::OutputTokenSelected(token.clone()))
            .await;
        Ok(token)
    }

    async fn switch_tokens(&self) {
        self.dispatch(SwapEvent::SwitchTokens).await;
    }

    async fn tick(&self) {
        self.dispatch(SwapEvent::Tick).await;
    }

    async fn execute_swap(&self) -> Result<TransactionRecord, SwapError> {
        let user_public_key = self
            .interactor
            .wallet_public_key()
            .filter(|_| self.interactor.is_wallet_connected())
            .ok_or(SwapError::WalletNotConnected)?;

        let quote = {
            let mut state = self.state.lock().await;
            if state.is_submitting() {
                return Err(SwapError::SwapUnavailable(
                    "A swap is already in progress".to_string(),
                ));
            }
            let quote = state
                .quote()
                .cloned()
                .ok_or_else(|| SwapError::SwapUnavailable("No quote available".to_string()))?;
            state.apply(SwapEvent::SubmissionStarted);
            quote
        };

        let mut progress = None;
        let result = self.run_swap(&quote, &user_public_key, &mut progress).await;

        if let Some(id) = progress.take() {
            self.dismiss(id).await;
        }

        self.state.lock().await.apply(SwapEvent::SubmissionFinished {
            reset: result.is_ok(),
            error: result.as_ref().err().map(|e| e.to_string()),
        });

        let shown = match &result {
            Ok(record) => {
                let link = explorer_url(&self.explorer_base, &record.signature);
                self.view.display_swap_success(record, &link).await
            }
            Err(e) => {
                warn!("Swap failed: {}", e);
                self.view
                    .display_swap_error(&format!("Swap failed: {}", e))
                    .await
            }
        };
        if let Err(e) = shown {
            warn!("Failed to display swap outcome: {}", e);
        }

        result
    }

    async fn connect_wallet(&self) -> Result<String, SwapError> {
        self.interactor.connect_wallet().await
    }

    async fn disconnect_wallet(&self) -> Result<(), SwapError> {
        self.interactor.disconnect_wallet().await
    }

    async fn show_tokens(&self, query: &str) -> Result<()> {
        let state = self.state.lock().await;
        let found = search_tokens(state.tokens(), query);
        self.view.display_tokens(&found).await
    }

    async fn show_quote(&self) -> Result<()> {
        let summary = {
            let state = self.state.lock().await;
            state.quote().map(|q| q.summary(state.countdown()))
        };

        match summary {
            Some(summary) => self.view.display_quote(&summary).await,
            None => self.view.display_quote_error("No quote available").await,
        }
    }

    async fn show_history(&self) -> Result<()> {
        let records = self.state.lock().await.history().records();
        self.view.display_history(&records).await
    }

    async fn snapshot(&self) -> SwapSnapshot {
        let state = self.state.lock().await;
        SwapSnapshot {
            phase: state.phase(),
            input_token: state.input_token().cloned(),
            output_token: state.output_token().cloned(),
            amount: state.amount().to_string(),
            quote: state.quote().map(|q| q.summary(state.countdown())),
            countdown: state.countdown(),
            last_error: state.last_error().map(str::to_string),
            history: state.history().records(),
            wallet_connected: self.interactor.is_wallet_connected(),
        }
    }
}
