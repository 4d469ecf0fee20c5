use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A point-in-time price snapshot for one ticker symbol.
///
/// Quotes are ephemeral: they are fetched from a provider, used for a
/// single operation (one buy, one sell, or one valuation pass) and then
/// discarded. They are never persisted and never reused across
/// operations — executing a later trade against a stale quote would
/// debit or credit the wrong amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker symbol, uppercased
    pub symbol: String,

    /// Company name (e.g., "Apple Inc.")
    pub company: String,

    /// Latest price per share
    pub price: f64,

    /// Absolute change versus the previous close
    pub change: f64,

    /// When the quote was taken
    pub as_of: DateTime<Utc>,
}

impl Quote {
    pub fn new(
        symbol: impl Into<String>,
        company: impl Into<String>,
        price: f64,
        change: f64,
    ) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            company: company.into(),
            price,
            change,
            as_of: Utc::now(),
        }
    }

    /// Reject quotes that cannot be traded against: the price must be a
    /// positive finite number. Zero, negative, NaN and infinite prices
    /// all indicate a broken upstream response.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(CoreError::QuoteUnavailable {
                symbol: self.symbol.clone(),
                reason: format!("invalid price {}", self.price),
            });
        }
        Ok(())
    }
}
