// src/solana/jupiter/models.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entity::Token;

// Token constants
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

// Swap modes (exact input or output amount)
#[derive(Serialize, Deserialize, Default, PartialEq, Clone, Debug)]
pub enum SwapMode {
    #[default]
    ExactIn,
    ExactOut,
}

// Accepts a float encoded either as a JSON number or a string, writes it back as a string
pub mod string_or_float {
    use serde::{self, Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrFloat;

        impl<'de> serde::de::Visitor<'de> for StringOrFloat {
            type Value = f64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a float or a string containing a float")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse::<f64>().map_err(serde::de::Error::custom)
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value as f64)
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value as f64)
            }
        }

        deserializer.deserialize_any(StringOrFloat)
    }
}

/// Token entry as served by the Jupiter token list
#[derive(Debug, Deserialize)]
pub struct JupiterToken {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[serde(rename = "logoURI")]
    pub logo_uri: Option<String>,
}

impl From<JupiterToken> for Token {
    fn from(token: JupiterToken) -> Self {
        Token {
            address: token.address,
            symbol: token.symbol,
            name: token.name,
            decimals: token.decimals,
            logo_uri: token.logo_uri.filter(|uri| !uri.is_empty()),
        }
    }
}

/// Error body returned by the Jupiter API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: Option<String>,
}

// Quote request parameters
#[derive(Default, Debug, Clone, PartialEq)]
pub struct QuoteParams {
    pub input_mint: String,
    pub output_mint: String,
    pub amount: u64,
    pub slippage_bps: u16,
    pub only_direct_routes: Option<bool>,
}

impl QuoteParams {
    /// Query string pairs for `GET /quote`
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("inputMint", self.input_mint.clone()),
            ("outputMint", self.output_mint.clone()),
            ("amount", self.amount.to_string()),
            ("slippageBps", self.slippage_bps.to_string()),
        ];

        if let Some(only_direct) = self.only_direct_routes {
            query.push(("onlyDirectRoutes", only_direct.to_string()));
        }

        query
    }
}

// Quote returned by the API. Unknown fields are carried through so the quote
// can be posted back to /swap unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: String,
    pub out_amount: String,
    pub other_amount_threshold: String,
    #[serde(default)]
    pub swap_mode: SwapMode,
    pub slippage_bps: u64,
    #[serde(with = "string_or_float")]
    pub price_impact_pct: f64,
    #[serde(default)]
    pub route_plan: Vec<RoutePlan>,
    pub context_slot: Option<u64>,
    pub time_taken: Option<f64>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

// Route leg
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    pub swap_info: SwapInfo,
    pub percent: u8,
}

// Swap details of a single route leg
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapInfo {
    pub amm_key: String,
    pub label: Option<String>,
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: String,
    pub out_amount: String,
    pub fee_amount: Option<String>,
    pub fee_mint: Option<String>,
}

/// Options forwarded to `POST /swap`
#[derive(Debug, Clone, PartialEq)]
pub struct SwapOptions {
    pub wrap_and_unwrap_sol: bool,
    pub compute_unit_price_micro_lamports: Option<u64>,
    pub as_legacy_transaction: bool,
}

impl Default for SwapOptions {
    fn default() -> Self {
        Self {
            wrap_and_unwrap_sol: true,
            compute_unit_price_micro_lamports: Some(1000),
            as_legacy_transaction: false,
        }
    }
}

// Swap transaction build request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub user_public_key: String,
    pub wrap_and_unwrap_sol: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_unit_price_micro_lamports: Option<u64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub as_legacy_transaction: bool,
    pub quote_response: QuoteResponse,
}

impl SwapRequest {
    pub fn new(quote_response: QuoteResponse, user_public_key: &str, options: &SwapOptions) -> Self {
        Self {
            user_public_key: user_public_key.to_string(),
            wrap_and_unwrap_sol: options.wrap_and_unwrap_sol,
            compute_unit_price_micro_lamports: options.compute_unit_price_micro_lamports,
            as_legacy_transaction: options.as_legacy_transaction,
            quote_response,
        }
    }
}

// Swap transaction build response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub swap_transaction: String,
    pub last_valid_block_height: u64,
    pub prioritization_fee_lamports: Option<u64>,
}

/// Decoded, still unsigned swap transaction bytes
#[derive(Debug, Clone, PartialEq)]
pub struct SwapTransaction {
    pub payload: Vec<u8>,
    pub last_valid_block_height: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quote_json() -> serde_json::Value {
        json!({
            "inputMint": SOL_MINT,
            "inAmount": "1500000000",
            "outputMint": USDC_MINT,
            "outAmount": "1240000",
            "otherAmountThreshold": "1234500",
            "swapMode": "ExactIn",
            "slippageBps": 50,
            "platformFee": null,
            "priceImpactPct": "0.0012",
            "routePlan": [{
                "swapInfo": {
                    "ammKey": "amm1",
                    "label": "Orca",
                    "inputMint": SOL_MINT,
                    "outputMint": USDC_MINT,
                    "inAmount": "1500000000",
                    "outAmount": "1240000",
                    "feeAmount": "100",
                    "feeMint": SOL_MINT
                },
                "percent": 100
            }],
            "contextSlot": 1234,
            "timeTaken": 0.01
        })
    }

    #[test]
    fn quote_response_parses_string_price_impact() {
        let quote: QuoteResponse = serde_json::from_value(quote_json()).unwrap();
        assert_eq!(quote.other_amount_threshold, "1234500");
        assert!((quote.price_impact_pct - 0.0012).abs() < f64::EPSILON);
        assert_eq!(quote.route_plan[0].swap_info.label.as_deref(), Some("Orca"));
        assert_eq!(quote.swap_mode, SwapMode::ExactIn);
    }

    #[test]
    fn swap_request_keeps_unknown_quote_fields() {
        let quote: QuoteResponse = serde_json::from_value(quote_json()).unwrap();
        let request = SwapRequest::new(quote, "UserKey", &SwapOptions::default());
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["userPublicKey"], "UserKey");
        assert_eq!(body["wrapAndUnwrapSol"], true);
        assert_eq!(body["computeUnitPriceMicroLamports"], 1000);
        assert!(body.get("asLegacyTransaction").is_none());
        assert!(body["quoteResponse"].get("platformFee").is_some());
        assert_eq!(body["quoteResponse"]["priceImpactPct"], "0.0012");
    }

    #[test]
    fn quote_params_build_query() {
        let params = QuoteParams {
            input_mint: SOL_MINT.to_string(),
            output_mint: USDC_MINT.to_string(),
            amount: 1_500_000_000,
            slippage_bps: 50,
            only_direct_routes: None,
        };

        let query = params.to_query();
        assert!(query.contains(&("amount", "1500000000".to_string())));
        assert!(query.contains(&("slippageBps", "50".to_string())));
        assert_eq!(query.len(), 4);
    }
}
