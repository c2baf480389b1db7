use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;

use crate::solana::jupiter::models::{ErrorResponse, QuoteParams, QuoteResponse};
use crate::solana::jupiter::Config;

/// Source of swap quotes
#[async_trait]
pub trait QuoteService: Send + Sync {
    /// Price an exchange of `params.amount` smallest units
    async fn get_quote(&self, params: &QuoteParams) -> Result<QuoteResponse>;
}

/// Quote service backed by the Jupiter quote API
pub struct JupiterQuoteService {
    http_client: Client,
    config: Config,
}

impl JupiterQuoteService {
    pub fn new(http_client: Client, config: Config) -> Self {
        Self {
            http_client,
            config,
        }
    }
}

/// Turn a JSON body into `T` unless it carries an API `error` field
pub(crate) fn check_for_api_error<T>(value: serde_json::Value) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    if let Ok(ErrorResponse { error, error_code }) =
        serde_json::from_value::<ErrorResponse>(value.clone())
    {
        return match error_code {
            Some(code) => Err(anyhow!("{} ({})", error, code)),
            None => Err(anyhow!("{}", error)),
        };
    }

    serde_json::from_value(value).map_err(|err| anyhow!("JSON deserialization error: {}", err))
}

/// Read a response body as JSON, surfacing the API `error` field on failure statuses
pub(crate) async fn read_api_response<T>(response: reqwest::Response) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| anyhow!("Failed to read response body: {}", e))?;

    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(value) if status.is_success() => check_for_api_error(value),
        Ok(value) => match serde_json::from_value::<ErrorResponse>(value) {
            Ok(ErrorResponse { error, .. }) => Err(anyhow!("{}", error)),
            Err(_) => Err(anyhow!("Request failed with status {}", status)),
        },
        Err(_) if !status.is_success() => {
            Err(anyhow!("Request failed with status {}: {}", status, body))
        }
        Err(e) => Err(anyhow!("Failed to parse response as JSON: {}", e)),
    }
}

#[async_trait]
impl QuoteService for JupiterQuoteService {
    async fn get_quote(&self, params: &QuoteParams) -> Result<QuoteResponse> {
        debug!("Requesting quote with parameters: {:?}", params);

        let response = self
            .http_client
            .get(self.config.quote_url())
            .query(&params.to_query())
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        let quote: QuoteResponse = read_api_response(response).await?;

        info!(
            "Quote received successfully: input_amount={}, output_amount={}",
            quote.in_amount, quote.out_amount
        );

        Ok(quote)
    }
}
