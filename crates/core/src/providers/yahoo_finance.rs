use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::quote::Quote;

/// Yahoo Finance API provider for stock quotes.
///
/// - **Free**: No API key required.
/// - **No strict rate limits** (unofficial public API).
/// - **Coverage**: Global equities, ETFs, indices, mutual funds.
///
/// Uses the `yahoo_finance_api` crate which wraps Yahoo Finance's
/// public endpoints. The latest close and the close before it come from
/// a short daily history window, which also covers weekends and
/// holidays; the company name comes from the symbol-search endpoint and
/// falls back to the raw ticker when unavailable.
///
/// **Note**: Not WASM-compatible (uses native reqwest/tokio).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }

    /// Convert a unix timestamp (seconds) to a UTC datetime,
    /// falling back to "now" for out-of-range values.
    fn timestamp_to_utc(ts: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(ts, 0).unwrap_or_else(Utc::now)
    }

    /// Look up the long company name for a symbol. Best-effort: any
    /// failure falls back to the ticker itself so a quote is still usable.
    async fn company_name(&self, symbol: &str) -> String {
        let upper = symbol.to_uppercase();
        match self.connector.search_ticker(&upper).await {
            Ok(result) => result
                .quotes
                .iter()
                .find(|item| item.symbol.eq_ignore_ascii_case(&upper))
                .map(|item| {
                    if item.long_name.is_empty() {
                        item.short_name.clone()
                    } else {
                        item.long_name.clone()
                    }
                })
                .filter(|name| !name.is_empty())
                .unwrap_or(upper),
            Err(e) => {
                log::debug!("Yahoo ticker search failed for {upper}: {e}");
                upper
            }
        }
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn lookup(&self, symbol: &str) -> Result<Quote, CoreError> {
        // A few days of daily bars: the last close is the current price,
        // the close before it gives the absolute change.
        let resp = self
            .connector
            .get_quote_range(symbol, "1d", "5d")
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch quotes for {symbol}: {e}"),
            })?;

        let bars = resp.quotes().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to parse quotes for {symbol}: {e}"),
        })?;

        let last = bars.last().ok_or_else(|| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("No quote data for {symbol}"),
        })?;

        let previous_close = if bars.len() >= 2 {
            bars[bars.len() - 2].close
        } else {
            last.close
        };

        let company = self.company_name(symbol).await;

        Ok(Quote {
            symbol: symbol.to_uppercase(),
            company,
            price: last.close,
            change: last.close - previous_close,
            as_of: Self::timestamp_to_utc(last.timestamp as i64),
        })
    }
}
