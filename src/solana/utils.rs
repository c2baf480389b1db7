use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Digits shown after the decimal point for token amounts
pub const DISPLAY_DECIMALS: u32 = 6;

// Decimal keeps at most 28 fractional digits
const MAX_DECIMALS: u8 = 28;

lazy_static! {
    static ref AMOUNT_RE: Regex = Regex::new(r"^(\d+\.?\d*|\.\d+)$").unwrap();
}

/// Whether the text is written as a plain decimal number, zero included
pub fn is_amount_text(input: &str) -> bool {
    AMOUNT_RE.is_match(input.trim())
}

/// Parse a user-entered amount. Returns `None` unless it is a positive number.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let input = input.trim();
    if !is_amount_text(input) {
        return None;
    }

    let normalized = match (input.starts_with('.'), input.ends_with('.')) {
        (true, _) => format!("0{}", input),
        (_, true) => format!("{}0", input),
        _ => input.to_string(),
    };

    Decimal::from_str(&normalized)
        .ok()
        .filter(|amount| amount.is_sign_positive() && !amount.is_zero())
}

/// Convert a human amount to the token's smallest units, truncating extra precision
pub fn to_smallest_units(amount: Decimal, decimals: u8) -> Result<u64> {
    if decimals > MAX_DECIMALS {
        return Err(anyhow!("Unsupported token precision: {} decimals", decimals));
    }

    let factor = Decimal::try_from_i128_with_scale(10i128.pow(decimals as u32), 0)
        .map_err(|e| anyhow!("Failed to build decimal factor: {}", e))?;

    amount
        .checked_mul(factor)
        .ok_or_else(|| anyhow!("Amount {} is too large", amount))?
        .trunc()
        .to_u64()
        .ok_or_else(|| anyhow!("Amount {} does not fit into token units", amount))
}

/// Convert a raw amount string in smallest units into a human amount
pub fn from_smallest_units(raw: &str, decimals: u8) -> Result<Decimal> {
    if decimals > MAX_DECIMALS {
        return Err(anyhow!("Unsupported token precision: {} decimals", decimals));
    }

    let units = raw
        .trim()
        .parse::<i128>()
        .map_err(|e| anyhow!("Invalid raw amount '{}': {}", raw, e))?;

    Decimal::try_from_i128_with_scale(units, decimals as u32)
        .map_err(|e| anyhow!("Raw amount '{}' is out of range: {}", raw, e))
}

/// Format a token amount with a fixed number of fractional digits
pub fn format_token_amount(amount: Decimal) -> String {
    let rounded =
        amount.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", DISPLAY_DECIMALS as usize, rounded)
}

/// Raw smallest-unit amount rendered for display, e.g. "1234500" with 6 decimals -> "1.234500"
pub fn display_raw_amount(raw: &str, decimals: u8) -> Result<String> {
    from_smallest_units(raw, decimals).map(format_token_amount)
}
