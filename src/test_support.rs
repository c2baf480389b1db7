//! In-memory stand-ins for the network, wallet and view seams.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::message::{v0, VersionedMessage};
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::transaction::VersionedTransaction;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

use crate::entity::{QuoteSummary, SwapStage, Token, TransactionRecord};
use crate::interactor::{SwapInteractorImpl, SwapState};
use crate::presenter::SwapPresenterImpl;
use crate::solana::client::{Confirmation, NetworkProvider};
use crate::solana::jupiter::models::{
    QuoteParams, QuoteResponse, SwapMode, SwapOptions, SwapTransaction, SOL_MINT, USDC_MINT,
};
use crate::solana::jupiter::{QuoteService, SwapService, TokenRepository};
use crate::solana::wallet::WalletProvider;
use crate::utils::DEFAULT_EXPLORER_URL;
use crate::view::{NotificationId, SwapView};

pub type TestPresenter = SwapPresenterImpl<SwapInteractorImpl, RecordingView>;

pub fn token(symbol: &str, name: &str, address: &str, decimals: u8) -> Token {
    Token {
        address: address.to_string(),
        symbol: symbol.to_string(),
        name: name.to_string(),
        decimals,
        logo_uri: None,
    }
}

pub fn sol() -> Token {
    token("SOL", "Wrapped SOL", SOL_MINT, 9)
}

pub fn usdc() -> Token {
    token("USDC", "USD Coin", USDC_MINT, 6)
}

pub fn bonk() -> Token {
    token(
        "Bonk",
        "Bonk",
        "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263",
        5,
    )
}

pub fn quote_response(in_amount: u64, out_amount: &str, threshold: &str) -> QuoteResponse {
    QuoteResponse {
        input_mint: SOL_MINT.to_string(),
        output_mint: USDC_MINT.to_string(),
        in_amount: in_amount.to_string(),
        out_amount: out_amount.to_string(),
        other_amount_threshold: threshold.to_string(),
        swap_mode: SwapMode::ExactIn,
        slippage_bps: 50,
        price_impact_pct: 0.0012,
        route_plan: vec![],
        context_slot: Some(1),
        time_taken: None,
        extra: HashMap::new(),
    }
}

pub struct StaticTokenRepository {
    failure: Mutex<Option<String>>,
}

impl StaticTokenRepository {
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl TokenRepository for StaticTokenRepository {
    async fn get_token_list(&self) -> Result<Vec<Token>> {
        match self.failure.lock().unwrap().clone() {
            Some(message) => Err(anyhow!(message)),
            None => Ok(vec![usdc(), bonk(), sol()]),
        }
    }
}

/// Answers every request immediately, recording the parameters
#[derive(Default)]
pub struct ScriptedQuoteService {
    calls: Mutex<Vec<QuoteParams>>,
    failure: Mutex<Option<String>>,
}

impl ScriptedQuoteService {
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<QuoteParams> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl QuoteService for ScriptedQuoteService {
    async fn get_quote(&self, params: &QuoteParams) -> Result<QuoteResponse> {
        self.calls.lock().unwrap().push(params.clone());
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }
        Ok(quote_response(params.amount, "1240000", "1234500"))
    }
}

/// Holds each request until the test releases it, keyed by amount in smallest units
pub struct GatedQuoteService {
    gates: Mutex<HashMap<u64, oneshot::Receiver<Result<QuoteResponse, String>>>>,
    started_tx: mpsc::UnboundedSender<u64>,
    started_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<u64>>,
}

impl GatedQuoteService {
    pub fn new() -> Self {
        let (started_tx, started_rx) = mpsc::unbounded_channel();
        Self {
            gates: Mutex::new(HashMap::new()),
            started_tx,
            started_rx: tokio::sync::Mutex::new(started_rx),
        }
    }

    pub fn gate(&self, amount: u64) -> oneshot::Sender<Result<QuoteResponse, String>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(amount, rx);
        tx
    }

    /// Wait for the next request to reach the service
    pub async fn next_started(&self) -> u64 {
        self.started_rx.lock().await.recv().await.unwrap()
    }
}

#[async_trait]
impl QuoteService for GatedQuoteService {
    async fn get_quote(&self, params: &QuoteParams) -> Result<QuoteResponse> {
        let gate = self
            .gates
            .lock()
            .unwrap()
            .remove(&params.amount)
            .ok_or_else(|| anyhow!("no gate for amount {}", params.amount))?;
        self.started_tx.send(params.amount).unwrap();

        gate.await
            .map_err(|_| anyhow!("gate dropped"))?
            .map_err(|message| anyhow!(message))
    }
}

/// Builds an unsigned v0 transaction paid by the wallet
pub struct FakeSwapService {
    payer: Keypair,
    calls: AtomicUsize,
    failure: Mutex<Option<String>>,
    options: Mutex<Vec<SwapOptions>>,
}

impl FakeSwapService {
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn options(&self) -> Vec<SwapOptions> {
        self.options.lock().unwrap().clone()
    }
}

#[async_trait]
impl SwapService for FakeSwapService {
    async fn build_swap(
        &self,
        _quote: &QuoteResponse,
        _user_public_key: &str,
        options: &SwapOptions,
    ) -> Result<SwapTransaction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.options.lock().unwrap().push(options.clone());
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }

        let message = v0::Message::try_compile(&self.payer.pubkey(), &[], &[], Hash::new_unique())?;
        let transaction = VersionedTransaction {
            signatures: vec![Signature::default()],
            message: VersionedMessage::V0(message),
        };

        Ok(SwapTransaction {
            payload: bincode::serialize(&transaction)?,
            last_valid_block_height: 250_000_000,
        })
    }
}

pub struct FakeWallet {
    keypair: Keypair,
    connected: AtomicBool,
    rejection: Mutex<Option<String>>,
}

impl FakeWallet {
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn reject_with(&self, message: &str) {
        *self.rejection.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn public_key(&self) -> Option<String> {
        self.is_connected().then(|| self.keypair.pubkey().to_string())
    }

    async fn connect(&self) -> Result<String> {
        self.set_connected(true);
        Ok(self.keypair.pubkey().to_string())
    }

    async fn disconnect(&self) -> Result<()> {
        self.set_connected(false);
        Ok(())
    }

    async fn sign_transaction(
        &self,
        transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction> {
        if let Some(message) = self.rejection.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }
        Ok(VersionedTransaction::try_new(
            transaction.message,
            &[&self.keypair],
        )?)
    }
}

pub struct FakeNetwork {
    broadcasts: AtomicUsize,
    broadcast_failure: Mutex<Option<String>>,
    confirmation_failure: Mutex<Option<String>>,
}

impl FakeNetwork {
    pub fn fail_broadcast_with(&self, message: &str) {
        *self.broadcast_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_confirmation_with(&self, message: &str) {
        *self.confirmation_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NetworkProvider for FakeNetwork {
    async fn broadcast(&self, transaction: &VersionedTransaction) -> Result<String> {
        if let Some(message) = self.broadcast_failure.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }
        self.broadcasts.fetch_add(1, Ordering::SeqCst);
        Ok(transaction.signatures[0].to_string())
    }

    async fn confirm(&self, _signature: &str) -> Result<Confirmation> {
        let error = self.confirmation_failure.lock().unwrap().clone();
        Ok(Confirmation {
            success: error.is_none(),
            error,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Progress(NotificationId, SwapStage),
    Dismissed(NotificationId),
    Success { signature: String, link: String },
    SwapError(String),
    Quote(QuoteSummary),
    QuoteError(String),
    History(Vec<TransactionRecord>),
    Tokens(Vec<String>),
}

/// Records every call in order
#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
    next_id: AtomicU64,
}

impl RecordingView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    fn record(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl SwapView for RecordingView {
    async fn display_progress(&self, stage: SwapStage) -> Result<NotificationId> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.record(ViewEvent::Progress(id, stage));
        Ok(id)
    }

    async fn dismiss(&self, id: NotificationId) -> Result<()> {
        self.record(ViewEvent::Dismissed(id));
        Ok(())
    }

    async fn display_swap_success(
        &self,
        record: &TransactionRecord,
        explorer_link: &str,
    ) -> Result<()> {
        self.record(ViewEvent::Success {
            signature: record.signature.clone(),
            link: explorer_link.to_string(),
        });
        Ok(())
    }

    async fn display_swap_error(&self, error_message: &str) -> Result<()> {
        self.record(ViewEvent::SwapError(error_message.to_string()));
        Ok(())
    }

    async fn display_quote(&self, summary: &QuoteSummary) -> Result<()> {
        self.record(ViewEvent::Quote(summary.clone()));
        Ok(())
    }

    async fn display_quote_error(&self, error_message: &str) -> Result<()> {
        self.record(ViewEvent::QuoteError(error_message.to_string()));
        Ok(())
    }

    async fn display_history(&self, records: &[TransactionRecord]) -> Result<()> {
        self.record(ViewEvent::History(records.to_vec()));
        Ok(())
    }

    async fn display_tokens(&self, tokens: &[&Token]) -> Result<()> {
        self.record(ViewEvent::Tokens(
            tokens.iter().map(|t| t.symbol.clone()).collect(),
        ));
        Ok(())
    }
}

/// One set of fakes wired behind a real interactor
pub struct Fakes {
    pub tokens: Arc<StaticTokenRepository>,
    pub quotes: Arc<ScriptedQuoteService>,
    pub swaps: Arc<FakeSwapService>,
    pub wallet: Arc<FakeWallet>,
    pub network: Arc<FakeNetwork>,
    pub view: Arc<RecordingView>,
}

impl Default for Fakes {
    fn default() -> Self {
        let keypair = Keypair::new();
        let payer = keypair.insecure_clone();

        Self {
            tokens: Arc::new(StaticTokenRepository {
                failure: Mutex::new(None),
            }),
            quotes: Arc::new(ScriptedQuoteService::default()),
            swaps: Arc::new(FakeSwapService {
                payer,
                calls: AtomicUsize::new(0),
                failure: Mutex::new(None),
                options: Mutex::new(Vec::new()),
            }),
            wallet: Arc::new(FakeWallet {
                keypair,
                connected: AtomicBool::new(true),
                rejection: Mutex::new(None),
            }),
            network: Arc::new(FakeNetwork {
                broadcasts: AtomicUsize::new(0),
                broadcast_failure: Mutex::new(None),
                confirmation_failure: Mutex::new(None),
            }),
            view: Arc::new(RecordingView::default()),
        }
    }
}

impl Fakes {
    pub fn interactor_with_quotes(&self, quotes: Arc<dyn QuoteService>) -> SwapInteractorImpl {
        SwapInteractorImpl::new(
            self.tokens.clone(),
            quotes,
            self.swaps.clone(),
            self.wallet.clone(),
            self.network.clone(),
            SwapOptions::default(),
        )
    }

    pub fn presenter(&self) -> Arc<TestPresenter> {
        self.presenter_with_quotes(self.quotes.clone())
    }

    pub fn presenter_with_quotes(&self, quotes: Arc<dyn QuoteService>) -> Arc<TestPresenter> {
        Arc::new(SwapPresenterImpl::new(
            Arc::new(self.interactor_with_quotes(quotes)),
            self.view.clone(),
            SwapState::default(),
            DEFAULT_EXPLORER_URL,
        ))
    }
}
