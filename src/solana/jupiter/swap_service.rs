use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use log::{debug, info};
use reqwest::Client as HttpClient;

use crate::solana::jupiter::models::{
    QuoteResponse, SwapOptions, SwapRequest, SwapResponse, SwapTransaction,
};
use crate::solana::jupiter::quote_service::read_api_response;
use crate::solana::jupiter::Config;

/// Builds unsigned swap transactions for a quote
#[async_trait]
pub trait SwapService: Send + Sync {
    async fn build_swap(
        &self,
        quote: &QuoteResponse,
        user_public_key: &str,
        options: &SwapOptions,
    ) -> Result<SwapTransaction>;
}

/// Swap service backed by the Jupiter `/swap` endpoint
pub struct JupiterSwapService {
    http_client: HttpClient,
    config: Config,
}

impl JupiterSwapService {
    pub fn new(http_client: HttpClient, config: Config) -> Self {
        Self {
            http_client,
            config,
        }
    }
}

/// Decode the base64 transaction returned by `/swap`
pub fn decode_swap_response(response: SwapResponse) -> Result<SwapTransaction> {
    let payload = STANDARD
        .decode(response.swap_transaction.trim())
        .map_err(|e| anyhow!("Invalid base64 transaction payload: {}", e))?;

    if payload.is_empty() {
        return Err(anyhow!("Swap transaction payload is empty"));
    }

    Ok(SwapTransaction {
        payload,
        last_valid_block_height: response.last_valid_block_height,
    })
}

#[async_trait]
impl SwapService for JupiterSwapService {
    async fn build_swap(
        &self,
        quote: &QuoteResponse,
        user_public_key: &str,
        options: &SwapOptions,
    ) -> Result<SwapTransaction> {
        let swap_request = SwapRequest::new(quote.clone(), user_public_key, options);

        debug!(
            "Requesting swap transaction with user_public_key: {}",
            user_public_key
        );

        let response = self
            .http_client
            .post(self.config.swap_url())
            .json(&swap_request)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        let swap_response: SwapResponse = read_api_response(response).await?;
        let transaction = decode_swap_response(swap_response)?;

        info!(
            "Swap transaction received: tx_length={}",
            transaction.payload.len()
        );

        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_payload() {
        let response = SwapResponse {
            swap_transaction: STANDARD.encode([1u8, 2, 3]),
            last_valid_block_height: 42,
            prioritization_fee_lamports: None,
        };

        let transaction = decode_swap_response(response).unwrap();
        assert_eq!(transaction.payload, vec![1, 2, 3]);
        assert_eq!(transaction.last_valid_block_height, 42);
    }

    #[test]
    fn rejects_invalid_or_empty_payload() {
        let invalid = SwapResponse {
            swap_transaction: "***".to_string(),
            last_valid_block_height: 1,
            prioritization_fee_lamports: None,
        };
        assert!(decode_swap_response(invalid).is_err());

        let empty = SwapResponse {
            swap_transaction: String::new(),
            last_valid_block_height: 1,
            prioritization_fee_lamports: None,
        };
        assert!(decode_swap_response(empty).is_err());
    }
}
