use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::entity::{QuoteSummary, SwapStage, Token, TransactionRecord};
use crate::utils::{explorer_url, shorten_address};

pub type NotificationId = u64;

/// Notification sink for the swap widget
#[async_trait]
pub trait SwapView: Send + Sync {
    /// Show a progress message that stays until dismissed
    async fn display_progress(&self, stage: SwapStage) -> Result<NotificationId>;

    async fn dismiss(&self, id: NotificationId) -> Result<()>;

    async fn display_swap_success(&self, record: &TransactionRecord, explorer_link: &str)
        -> Result<()>;

    async fn display_swap_error(&self, error_message: &str) -> Result<()>;

    async fn display_quote(&self, summary: &QuoteSummary) -> Result<()>;

    async fn display_quote_error(&self, error_message: &str) -> Result<()>;

    async fn display_history(&self, records: &[TransactionRecord]) -> Result<()>;

    async fn display_tokens(&self, tokens: &[&Token]) -> Result<()>;
}

/// Plain terminal rendering of the widget
pub struct TerminalSwapView {
    explorer_base: String,
    next_id: AtomicU64,
    active: Mutex<Option<NotificationId>>,
}

impl TerminalSwapView {
    pub fn new(explorer_base: &str) -> Self {
        Self {
            explorer_base: explorer_base.to_string(),
            next_id: AtomicU64::new(1),
            active: Mutex::new(None),
        }
    }

    fn set_active(&self, id: Option<NotificationId>) {
        if let Ok(mut active) = self.active.lock() {
            *active = id;
        }
    }
}

#[async_trait]
impl SwapView for TerminalSwapView {
    async fn display_progress(&self, stage: SwapStage) -> Result<NotificationId> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.set_active(Some(id));
        println!("⏳ {}", stage.message());
        Ok(id)
    }

    async fn dismiss(&self, id: NotificationId) -> Result<()> {
        if let Ok(mut active) = self.active.lock() {
            if *active == Some(id) {
                *active = None;
            }
        }
        Ok(())
    }

    async fn display_swap_success(
        &self,
        record: &TransactionRecord,
        explorer_link: &str,
    ) -> Result<()> {
        println!(
            "✅ Swap successful!\n\
            {}\n\
            View on Solscan: {}",
            record.describe(),
            explorer_link
        );
        info!("Swap {} succeeded", record.signature);
        Ok(())
    }

    async fn display_swap_error(&self, error_message: &str) -> Result<()> {
        println!("❌ {}", error_message);
        error!("{}", error_message);
        Ok(())
    }

    async fn display_quote(&self, summary: &QuoteSummary) -> Result<()> {
        let impact_marker = if summary.high_price_impact { " ⚠️" } else { "" };
        let expiry_marker = if summary.is_expiring() { " (expiring)" } else { "" };
        println!(
            "You pay: {} {}\n\
            You receive: ~{} {}\n\
            Price Impact: {:.2}%{}\n\
            Minimum Received: {} {}\n\
            Route: {}\n\
            Quote refreshes in: {}s{}",
            summary.input_amount,
            summary.input_symbol,
            summary.expected_output,
            summary.output_symbol,
            summary.price_impact_pct,
            impact_marker,
            summary.minimum_received,
            summary.output_symbol,
            summary.route,
            summary.refresh_in,
            expiry_marker
        );
        Ok(())
    }

    async fn display_quote_error(&self, error_message: &str) -> Result<()> {
        println!("❌ Quote error: {}", error_message);
        Ok(())
    }

    async fn display_history(&self, records: &[TransactionRecord]) -> Result<()> {
        if records.is_empty() {
            println!("No recent transactions");
            return Ok(());
        }

        println!("Recent Transactions");
        for record in records {
            println!(
                "  [{}] {} ({})\n    {}",
                record.status,
                record.describe(),
                record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                explorer_url(&self.explorer_base, &record.signature)
            );
        }
        Ok(())
    }

    async fn display_tokens(&self, tokens: &[&Token]) -> Result<()> {
        if tokens.is_empty() {
            println!("No token found");
            return Ok(());
        }

        for token in tokens {
            println!(
                "  {:<10} {:<30} {}",
                token.symbol,
                token.name,
                shorten_address(&token.address)
            );
        }
        Ok(())
    }
}
