use crate::errors::CoreError;
use crate::models::quote::Quote;
use crate::providers::registry::QuoteProviderRegistry;

/// Fetches live quotes from API providers with automatic fallback.
///
/// Tries providers in registration order. If the primary fails (API
/// down, rate limited, garbage price), the next provider is tried.
/// Every returned quote has been validated: finite positive price,
/// uppercased symbol.
///
/// **Note on precision**: prices are `f64`, which has ~15-17
/// significant decimal digits. Sufficient for simulated trading, but
/// repeated arithmetic may accumulate small floating-point errors.
pub struct QuoteService {
    registry: QuoteProviderRegistry,
}

impl QuoteService {
    pub fn new(registry: QuoteProviderRegistry) -> Self {
        Self { registry }
    }

    /// Whether at least one quote provider is registered.
    pub fn has_provider(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Names of all registered providers, in fallback order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    /// Fetch the latest quote for a symbol.
    ///
    /// Walks the provider chain; the first provider returning a valid
    /// quote wins. When every provider fails, the whole lookup fails
    /// with `QuoteUnavailable` carrying the last underlying error.
    pub async fn lookup(&self, symbol: &str) -> Result<Quote, CoreError> {
        let upper = symbol.trim().to_uppercase();
        if upper.is_empty() {
            return Err(CoreError::ValidationError(
                "Ticker symbol must not be empty".into(),
            ));
        }

        let mut last_error: Option<CoreError> = None;

        for provider in self.registry.providers() {
            match provider.lookup(&upper).await {
                Ok(quote) => {
                    if let Err(e) = quote.validate() {
                        log::warn!(
                            "{} returned unusable quote for {upper}: {e}",
                            provider.name()
                        );
                        last_error = Some(e);
                        continue;
                    }
                    return Ok(quote);
                }
                Err(e) => {
                    log::debug!("{} lookup failed for {upper}: {e}", provider.name());
                    last_error = Some(e);
                    // Try next provider
                }
            }
        }

        Err(CoreError::QuoteUnavailable {
            symbol: upper,
            reason: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no quote provider registered".into()),
        })
    }
}
