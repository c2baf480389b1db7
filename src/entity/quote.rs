use anyhow::{anyhow, Result};
use log::warn;

use crate::entity::Token;
use crate::solana::jupiter::models::QuoteResponse;
use crate::solana::utils::{display_raw_amount, from_smallest_units};

// Price impact above this percentage is flagged in the quote panel
pub const HIGH_PRICE_IMPACT_PCT: f64 = 1.0;

// Countdown values at or below this are shown as about to expire
pub const QUOTE_EXPIRING_TICKS: u32 = 5;

/// A priced quote for one token pair and amount. Replaced, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub seq: u64,
    pub input_token: Token,
    pub output_token: Token,
    pub amount: String,
    pub response: QuoteResponse,
}

/// What the quote panel shows
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSummary {
    pub input_amount: String,
    pub input_symbol: String,
    pub output_symbol: String,
    pub expected_output: String,
    pub minimum_received: String,
    pub price_impact_pct: f64,
    pub high_price_impact: bool,
    pub route: String,
    pub refresh_in: u32,
}

impl QuoteSummary {
    pub fn is_expiring(&self) -> bool {
        self.refresh_in <= QUOTE_EXPIRING_TICKS
    }
}

impl Quote {
    pub fn new(
        seq: u64,
        input_token: Token,
        output_token: Token,
        amount: String,
        response: QuoteResponse,
    ) -> Self {
        Self {
            seq,
            input_token,
            output_token,
            amount,
            response,
        }
    }

    /// Both output amounts must be whole smallest-unit numbers
    pub fn check_amounts(&self) -> Result<()> {
        for (field, raw) in [
            ("outAmount", &self.response.out_amount),
            ("otherAmountThreshold", &self.response.other_amount_threshold),
        ] {
            from_smallest_units(raw, self.output_token.decimals)
                .map_err(|e| anyhow!("Malformed quote {}: {}", field, e))?;
        }
        Ok(())
    }

    /// `otherAmountThreshold` in output token units, 6 fractional digits
    pub fn minimum_received(&self) -> String {
        display_output_amount(&self.response.other_amount_threshold, &self.output_token)
    }

    pub fn expected_output(&self) -> String {
        display_output_amount(&self.response.out_amount, &self.output_token)
    }

    /// Price impact as a percentage (the API reports a fraction)
    pub fn price_impact_pct(&self) -> f64 {
        self.response.price_impact_pct * 100.0
    }

    /// Route labels joined in hop order, AMM keys where no label is given
    pub fn route_summary(&self) -> String {
        let hops: Vec<&str> = self
            .response
            .route_plan
            .iter()
            .map(|plan| {
                plan.swap_info
                    .label
                    .as_deref()
                    .unwrap_or(plan.swap_info.amm_key.as_str())
            })
            .collect();

        if hops.is_empty() {
            "direct".to_string()
        } else {
            hops.join(" → ")
        }
    }

    pub fn summary(&self, refresh_in: u32) -> QuoteSummary {
        let price_impact_pct = self.price_impact_pct();

        QuoteSummary {
            input_amount: self.amount.trim().to_string(),
            input_symbol: self.input_token.symbol.clone(),
            output_symbol: self.output_token.symbol.clone(),
            expected_output: self.expected_output(),
            minimum_received: self.minimum_received(),
            price_impact_pct,
            high_price_impact: price_impact_pct > HIGH_PRICE_IMPACT_PCT,
            route: self.route_summary(),
            refresh_in,
        }
    }
}

fn display_output_amount(raw: &str, token: &Token) -> String {
    display_raw_amount(raw, token.decimals).unwrap_or_else(|e| {
        warn!("Cannot display {} amount '{}': {}", token.symbol, raw, e);
        "0.000000".to_string()
    })
}
