//! Swap widget state and its single transition function.
//!
//! Every mutation (user input, countdown ticks, quote responses, submission
//! bookkeeping) is a [`SwapEvent`] applied through [`SwapState::apply`]. Quote
//! requests carry a sequence number; a response is applied only if it answers
//! the most recently issued request, so a slow stale response can never
//! overwrite a newer one.

use log::debug;

use crate::entity::{
    Quote, QuoteSummary, Token, TransactionHistory, TransactionRecord, TxStatus,
    MAX_RECENT_TRANSACTIONS,
};
use crate::solana::jupiter::models::{QuoteParams, QuoteResponse, SOL_MINT, USDC_MINT};
use crate::solana::jupiter::config::DEFAULT_SLIPPAGE_BPS;
use crate::solana::utils::{parse_amount, to_smallest_units};

/// Countdown ticks between automatic quote refreshes
pub const QUOTE_REFRESH_TICKS: u32 = 15;

pub const TOKEN_LIST_ERROR: &str = "Failed to load token list";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapPhase {
    Idle,
    Quoting,
    Quoted,
    Submitting,
}

/// A quote request the caller must perform, answered with `SwapEvent::QuoteResolved`
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub seq: u64,
    pub params: QuoteParams,
    pub input_token: Token,
    pub output_token: Token,
    pub amount: String,
}

#[derive(Debug, Clone)]
pub enum SwapEvent {
    TokensLoaded(Vec<Token>),
    TokensFailed(String),
    AmountChanged(String),
    InputTokenSelected(Token),
    OutputTokenSelected(Token),
    SwitchTokens,
    Tick,
    QuoteResolved {
        seq: u64,
        result: Result<QuoteResponse, String>,
    },
    SubmissionStarted,
    TransactionSent(TransactionRecord),
    TransactionSettled {
        signature: String,
        status: TxStatus,
    },
    SubmissionFinished {
        reset: bool,
        error: Option<String>,
    },
}

/// What the caller has to do after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    FetchQuote(QuoteRequest),
    QuoteUpdated(QuoteSummary),
    QuoteFailed(String),
    Discarded,
}

#[derive(Debug, Clone)]
pub struct SwapState {
    tokens: Vec<Token>,
    input_token: Option<Token>,
    output_token: Option<Token>,
    amount: String,
    quote: Option<Quote>,
    countdown: u32,
    fetching_quote: bool,
    submitting: bool,
    last_error: Option<String>,
    history: TransactionHistory,
    latest_seq: u64,
    pending: Option<QuoteRequest>,
    slippage_bps: u16,
    refresh_ticks: u32,
}

impl Default for SwapState {
    fn default() -> Self {
        Self::new(DEFAULT_SLIPPAGE_BPS, QUOTE_REFRESH_TICKS, MAX_RECENT_TRANSACTIONS)
    }
}

impl SwapState {
    pub fn new(slippage_bps: u16, refresh_ticks: u32, history_capacity: usize) -> Self {
        let refresh_ticks = refresh_ticks.max(1);
        Self {
            tokens: Vec::new(),
            input_token: None,
            output_token: None,
            amount: String::new(),
            quote: None,
            countdown: refresh_ticks,
            fetching_quote: false,
            submitting: false,
            last_error: None,
            history: TransactionHistory::with_capacity(history_capacity),
            latest_seq: 0,
            pending: None,
            slippage_bps,
            refresh_ticks,
        }
    }

    pub fn apply(&mut self, event: SwapEvent) -> Effect {
        match event {
            SwapEvent::TokensLoaded(tokens) => {
                self.tokens = tokens;
                self.seed_default_tokens();
                self.request_quote()
            }
            SwapEvent::TokensFailed(message) => {
                debug!("Token list unavailable: {}", message);
                self.tokens.clear();
                self.last_error = Some(TOKEN_LIST_ERROR.to_string());
                Effect::None
            }
            SwapEvent::AmountChanged(amount) => {
                self.amount = amount;
                self.request_quote()
            }
            SwapEvent::InputTokenSelected(token) => {
                self.input_token = Some(token);
                self.request_quote()
            }
            SwapEvent::OutputTokenSelected(token) => {
                self.output_token = Some(token);
                self.request_quote()
            }
            SwapEvent::SwitchTokens => {
                std::mem::swap(&mut self.input_token, &mut self.output_token);
                self.request_quote()
            }
            SwapEvent::Tick => self.tick(),
            SwapEvent::QuoteResolved { seq, result } => self.resolve_quote(seq, result),
            SwapEvent::SubmissionStarted => {
                self.submitting = true;
                self.last_error = None;
                Effect::None
            }
            SwapEvent::TransactionSent(record) => {
                self.history.push(record);
                Effect::None
            }
            SwapEvent::TransactionSettled { signature, status } => {
                if !self.history.settle(&signature, status) {
                    debug!("Transaction {} not settled as {}", signature, status);
                }
                Effect::None
            }
            SwapEvent::SubmissionFinished { reset, error } => {
                self.submitting = false;
                if let Some(error) = error {
                    self.last_error = Some(error);
                }
                if reset {
                    self.amount.clear();
                    self.invalidate_quote();
                }
                Effect::None
            }
        }
    }

    fn seed_default_tokens(&mut self) {
        if self.input_token.is_none() {
            self.input_token = self.find_default(SOL_MINT, "SOL");
        }
        if self.output_token.is_none() {
            self.output_token = self.find_default(USDC_MINT, "USDC");
        }
    }

    fn find_default(&self, mint: &str, symbol: &str) -> Option<Token> {
        self.tokens
            .iter()
            .find(|t| t.address == mint)
            .or_else(|| self.tokens.iter().find(|t| t.symbol == symbol))
            .cloned()
    }

    /// Issue a request for the current selection, or invalidate when not ready
    fn request_quote(&mut self) -> Effect {
        match self.build_request() {
            Some(request) => {
                self.fetching_quote = true;
                self.last_error = None;
                self.pending = Some(request.clone());
                debug!(
                    "Quote request #{}: {} {} -> {}",
                    request.seq,
                    request.amount.trim(),
                    request.input_token.symbol,
                    request.output_token.symbol
                );
                Effect::FetchQuote(request)
            }
            None => {
                self.invalidate_quote();
                Effect::None
            }
        }
    }

    fn build_request(&mut self) -> Option<QuoteRequest> {
        let input_token = self.input_token.clone()?;
        let output_token = self.output_token.clone()?;
        if input_token.address == output_token.address {
            return None;
        }

        let amount = parse_amount(&self.amount)?;
        let units = to_smallest_units(amount, input_token.decimals)
            .ok()
            .filter(|units| *units > 0)?;

        self.latest_seq += 1;

        Some(QuoteRequest {
            seq: self.latest_seq,
            params: QuoteParams {
                input_mint: input_token.address.clone(),
                output_mint: output_token.address.clone(),
                amount: units,
                slippage_bps: self.slippage_bps,
                only_direct_routes: None,
            },
            input_token,
            output_token,
            amount: self.amount.clone(),
        })
    }

    // Drops the current quote and orphans any in-flight request
    fn invalidate_quote(&mut self) {
        self.latest_seq += 1;
        self.pending = None;
        self.quote = None;
        self.fetching_quote = false;
    }

    fn tick(&mut self) -> Effect {
        if self.quote.is_none() || self.countdown == 0 {
            return Effect::None;
        }

        self.countdown -= 1;
        if self.countdown > 0 || self.amount.trim().is_empty() {
            return Effect::None;
        }

        self.countdown = self.refresh_ticks;
        self.request_quote()
    }

    fn resolve_quote(&mut self, seq: u64, result: Result<QuoteResponse, String>) -> Effect {
        if seq != self.latest_seq {
            debug!(
                "Discarding superseded quote #{} (latest #{})",
                seq, self.latest_seq
            );
            return Effect::Discarded;
        }

        let Some(request) = self.pending.take() else {
            return Effect::Discarded;
        };
        self.fetching_quote = false;

        match result {
            Ok(response) => {
                let quote = Quote::new(
                    seq,
                    request.input_token,
                    request.output_token,
                    request.amount,
                    response,
                );
                if let Err(e) = quote.check_amounts() {
                    return self.fail_quote(e.to_string());
                }
                self.countdown = self.refresh_ticks;
                let summary = quote.summary(self.countdown);
                self.quote = Some(quote);
                Effect::QuoteUpdated(summary)
            }
            Err(message) => self.fail_quote(message),
        }
    }

    fn fail_quote(&mut self, message: String) -> Effect {
        self.quote = None;
        self.last_error = Some(message.clone());
        Effect::QuoteFailed(message)
    }

    pub fn phase(&self) -> SwapPhase {
        if self.submitting {
            SwapPhase::Submitting
        } else if self.fetching_quote {
            SwapPhase::Quoting
        } else if self.quote.is_some() {
            SwapPhase::Quoted
        } else {
            SwapPhase::Idle
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn input_token(&self) -> Option<&Token> {
        self.input_token.as_ref()
    }

    pub fn output_token(&self) -> Option<&Token> {
        self.output_token.as_ref()
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn is_fetching_quote(&self) -> bool {
        self.fetching_quote
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn history(&self) -> &TransactionHistory {
        &self.history
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }
}
