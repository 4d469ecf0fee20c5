use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::quote::Quote;

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage API provider for stock quotes.
///
/// - **Free tier**: 25 requests/day (across ALL endpoints).
/// - **Requires**: API key (registered as "alphavantage").
/// - **Coverage**: 100k+ global equity symbols.
///
/// Used as the fallback behind Yahoo Finance. The GLOBAL_QUOTE endpoint
/// carries price and change; the company name needs a second
/// SYMBOL_SEARCH call, which is best-effort — a missing name never
/// fails the quote.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
}

#[derive(Deserialize)]
struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "09. change")]
    change: Option<String>,
}

#[derive(Deserialize)]
struct SymbolSearchResponse {
    #[serde(rename = "bestMatches")]
    best_matches: Option<Vec<SymbolMatch>>,
}

#[derive(Deserialize)]
struct SymbolMatch {
    #[serde(rename = "1. symbol")]
    symbol: Option<String>,
    #[serde(rename = "2. name")]
    name: Option<String>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "Alpha Vantage"
    }

    async fn lookup(&self, symbol: &str) -> Result<Quote, CoreError> {
        let upper = symbol.to_uppercase();

        let resp: GlobalQuoteResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", upper.as_str()),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Alpha Vantage".into(),
                message: format!("Failed to parse quote for {upper}: {e}"),
            })?;

        let quote = resp.global_quote.ok_or_else(|| CoreError::Api {
            provider: "Alpha Vantage".into(),
            message: format!("No quote data for {upper}. API limit may be exceeded."),
        })?;

        let price: f64 = quote
            .price
            .as_deref()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| CoreError::Api {
                provider: "Alpha Vantage".into(),
                message: format!("Invalid price format for {upper}"),
            })?;

        let change: f64 = quote
            .change
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or(0.0);

        let symbol = quote.symbol.unwrap_or(upper);
        let company = self.company_name(&symbol).await;

        Ok(Quote {
            symbol,
            company,
            price,
            change,
            as_of: Utc::now(),
        })
    }
}

impl AlphaVantageProvider {
    /// Resolve the company name via SYMBOL_SEARCH, falling back to the
    /// ticker itself on any failure (each call burns daily quota).
    async fn company_name(&self, symbol: &str) -> String {
        let result: Result<SymbolSearchResponse, _> = async {
            self.client
                .get(BASE_URL)
                .query(&[
                    ("function", "SYMBOL_SEARCH"),
                    ("keywords", symbol),
                    ("apikey", &self.api_key),
                ])
                .send()
                .await?
                .json::<SymbolSearchResponse>()
                .await
        }
        .await;

        match result {
            Ok(resp) => resp
                .best_matches
                .unwrap_or_default()
                .into_iter()
                .find(|m| {
                    m.symbol
                        .as_deref()
                        .is_some_and(|s| s.eq_ignore_ascii_case(symbol))
                })
                .and_then(|m| m.name)
                .unwrap_or_else(|| symbol.to_string()),
            Err(e) => {
                log::debug!("Alpha Vantage symbol search failed for {symbol}: {e}");
                symbol.to_string()
            }
        }
    }
}
