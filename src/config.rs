//! Application settings, read from `SWAP_*` environment variables on top of defaults.

use config::{ConfigError, Environment};
use serde::Deserialize;
use std::time::Duration;

use crate::entity::{SwapError, MAX_RECENT_TRANSACTIONS};
use crate::interactor::QUOTE_REFRESH_TICKS;
use crate::solana::jupiter::config::{
    Config as JupiterConfig, DEFAULT_QUOTE_API_URL, DEFAULT_SLIPPAGE_BPS, DEFAULT_TOKEN_LIST_URL,
};
use crate::solana::jupiter::models::SwapOptions;
use crate::utils::DEFAULT_EXPLORER_URL;

pub const ENV_PREFIX: &str = "SWAP";
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

// Slippage above 100% is meaningless
const MAX_SLIPPAGE_BPS: u16 = 10_000;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    pub quote_api_url: String,
    pub token_list_url: String,
    pub rpc_url: String,
    /// Base58 keypair of the signing wallet
    pub wallet_keypair: Option<String>,
    pub slippage_bps: u16,
    pub refresh_interval_ms: u64,
    pub quote_refresh_ticks: u32,
    pub history_capacity: usize,
    pub explorer_url: String,
    pub request_timeout_secs: u64,
    pub confirm_poll_interval_ms: u64,
    pub confirm_max_attempts: u32,
    pub compute_unit_price_micro_lamports: u64,
    pub wrap_and_unwrap_sol: bool,
    pub as_legacy_transaction: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quote_api_url: DEFAULT_QUOTE_API_URL.to_string(),
            token_list_url: DEFAULT_TOKEN_LIST_URL.to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            wallet_keypair: None,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            refresh_interval_ms: 1000,
            quote_refresh_ticks: QUOTE_REFRESH_TICKS,
            history_capacity: MAX_RECENT_TRANSACTIONS,
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            request_timeout_secs: 30,
            confirm_poll_interval_ms: 2000,
            confirm_max_attempts: 30,
            compute_unit_price_micro_lamports: 1000,
            wrap_and_unwrap_sol: true,
            as_legacy_transaction: false,
        }
    }
}

impl AppConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self, SwapError> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX))
    }

    pub fn from_environment(environment: Environment) -> Result<Self, SwapError> {
        let defaults = Self::default();

        let settings = config::Config::builder()
            .set_default("quote_api_url", defaults.quote_api_url)?
            .set_default("token_list_url", defaults.token_list_url)?
            .set_default("rpc_url", defaults.rpc_url)?
            .set_default("slippage_bps", defaults.slippage_bps as i64)?
            .set_default("refresh_interval_ms", defaults.refresh_interval_ms as i64)?
            .set_default("quote_refresh_ticks", defaults.quote_refresh_ticks as i64)?
            .set_default("history_capacity", defaults.history_capacity as i64)?
            .set_default("explorer_url", defaults.explorer_url)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default(
                "confirm_poll_interval_ms",
                defaults.confirm_poll_interval_ms as i64,
            )?
            .set_default("confirm_max_attempts", defaults.confirm_max_attempts as i64)?
            .set_default(
                "compute_unit_price_micro_lamports",
                defaults.compute_unit_price_micro_lamports as i64,
            )?
            .set_default("wrap_and_unwrap_sol", defaults.wrap_and_unwrap_sol)?
            .set_default("as_legacy_transaction", defaults.as_legacy_transaction)?
            .add_source(environment.try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SwapError> {
        if self.slippage_bps > MAX_SLIPPAGE_BPS {
            return Err(ConfigError::Message(format!(
                "slippage_bps must be at most {}, got {}",
                MAX_SLIPPAGE_BPS, self.slippage_bps
            ))
            .into());
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::Message("refresh_interval_ms must be positive".into()).into());
        }
        Ok(())
    }

    pub fn jupiter(&self) -> JupiterConfig {
        JupiterConfig {
            quote_api_url: self.quote_api_url.clone(),
            token_list_url: self.token_list_url.clone(),
        }
    }

    pub fn swap_options(&self) -> SwapOptions {
        SwapOptions {
            wrap_and_unwrap_sol: self.wrap_and_unwrap_sol,
            compute_unit_price_micro_lamports: Some(self.compute_unit_price_micro_lamports)
                .filter(|price| *price > 0),
            as_legacy_transaction: self.as_legacy_transaction,
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn confirm_poll_interval(&self) -> Duration {
        Duration::from_millis(self.confirm_poll_interval_ms)
    }
}
