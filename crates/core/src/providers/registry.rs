use std::collections::HashMap;

use super::alphavantage::AlphaVantageProvider;
use super::traits::QuoteProvider;
#[cfg(not(target_arch = "wasm32"))]
use super::yahoo_finance::YahooFinanceProvider;

/// Registry of all available quote providers, in fallback order.
///
/// The quote service walks the registered providers front to back and
/// takes the first usable quote. New providers can be added without
/// modifying existing code.
pub struct QuoteProviderRegistry {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with all default providers pre-configured.
    pub fn new_with_defaults(api_keys: &HashMap<String, String>) -> Self {
        let mut registry = Self::new();

        // Yahoo Finance — NO API key needed (primary).
        // Not available on WASM (uses native reqwest/tokio connectors).
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Ok(yahoo) = YahooFinanceProvider::new() {
                registry.register(Box::new(yahoo));
            }
        }

        // Alpha Vantage — requires API key (fallback)
        if let Some(key) = api_keys.get("alphavantage") {
            registry.register(Box::new(AlphaVantageProvider::new(key.clone())));
        }

        registry
    }

    /// Register a new quote provider at the end of the fallback chain.
    pub fn register(&mut self, provider: Box<dyn QuoteProvider>) {
        self.providers.push(provider);
    }

    /// All registered providers, in fallback order.
    pub fn providers(&self) -> Vec<&dyn QuoteProvider> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    /// Whether any provider is registered at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Names of all registered providers, in fallback order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }
}

impl Default for QuoteProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
