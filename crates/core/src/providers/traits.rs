use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::quote::Quote;

/// Trait abstraction for all market-data providers.
///
/// Each quote source (Yahoo Finance, Alpha Vantage) implements this
/// trait. If an API stops working or changes, we replace only that one
/// implementation — the rest of the codebase is untouched.
///
/// Lookups must be safe to repeat: a provider call has no side effects
/// beyond the HTTP request itself. Retry and backoff policy, if any,
/// belongs inside the provider implementation, not in the callers.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the latest quote for a ticker symbol.
    async fn lookup(&self, symbol: &str) -> Result<Quote, CoreError>;
}
