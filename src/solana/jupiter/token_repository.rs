// src/solana/jupiter/token_repository.rs
use crate::entity::Token;
use crate::solana::jupiter::{Config, JupiterToken};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;

/// Catalog of tradable tokens
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Fetch the full tradable token list
    async fn get_token_list(&self) -> Result<Vec<Token>>;
}

/// Token catalog served by the Jupiter token list
pub struct JupiterTokenRepository {
    http_client: Client,
    config: Config,
}

impl JupiterTokenRepository {
    pub fn new(http_client: Client, config: Config) -> Self {
        Self {
            http_client,
            config,
        }
    }
}

#[async_trait]
impl TokenRepository for JupiterTokenRepository {
    async fn get_token_list(&self) -> Result<Vec<Token>> {
        info!("Fetching token list from {}", self.config.token_list_url);

        let response = self
            .http_client
            .get(&self.config.token_list_url)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to fetch token list from Jupiter API: {}", e);
                anyhow!("Failed to fetch token list: {}", e)
            })?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Jupiter API error [get_token_list]: {}", error_text);
            return Err(anyhow!("Jupiter API error: {}", error_text));
        }

        let tokens: Vec<JupiterToken> = response.json().await.map_err(|e| {
            error!("Failed to parse token list response: {}", e);
            anyhow!("Failed to parse token list response: {}", e)
        })?;

        info!("Token list loaded ({} tokens)", tokens.len());

        Ok(tokens.into_iter().map(Token::from).collect())
    }
}
