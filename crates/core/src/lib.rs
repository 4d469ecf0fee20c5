pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;
pub mod store;

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use errors::CoreError;
use models::{
    account::Account,
    holding::Holding,
    quote::Quote,
    trade::{TradeKind, TradeReceipt, TradeRecord},
    valuation::PortfolioValuation,
    watchlist::Watchlist,
};
use providers::registry::QuoteProviderRegistry;
use services::{
    account_service::AccountService, quote_service::QuoteService,
    trading_service::TradingService, valuation_service::ValuationService,
    watchlist_service::WatchlistService,
};
use storage::manager::StorageManager;
use store::memory::MemoryStore;
use store::PortfolioStore;

/// Main entry point for the Paper Trader core library.
///
/// Owns the account store and all services needed to operate on it.
/// Everything is injected explicitly: the store and the quote-provider
/// registry come in through the constructor, there is no process-wide
/// state.
#[must_use]
pub struct PaperTrader {
    store: MemoryStore,
    quote_service: QuoteService,
    trading_service: TradingService,
    valuation_service: ValuationService,
    account_service: AccountService,
    watchlist_service: WatchlistService,
    api_keys: HashMap<String, String>,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for PaperTrader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaperTrader")
            .field("accounts", &self.store.account_ids().map(|ids| ids.len()))
            .field("providers", &self.quote_service.provider_names())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl PaperTrader {
    /// Create a brand new simulator with an empty store and the default
    /// provider chain (no API keys configured).
    pub fn create_new() -> Self {
        Self::build(MemoryStore::new(), HashMap::new())
    }

    /// Create a simulator with an explicit store and provider registry.
    pub fn with_parts(store: MemoryStore, registry: QuoteProviderRegistry) -> Self {
        Self {
            store,
            quote_service: QuoteService::new(registry),
            trading_service: TradingService::new(),
            valuation_service: ValuationService::new(),
            account_service: AccountService::new(),
            watchlist_service: WatchlistService::new(),
            api_keys: HashMap::new(),
            dirty: false,
        }
    }

    /// Load existing state from encrypted bytes (password required).
    /// Use this for WASM / Tauri where the frontend handles file I/O.
    pub fn load_from_bytes(encrypted: &[u8], password: &str) -> Result<Self, CoreError> {
        let snapshot = StorageManager::load_from_bytes(encrypted, password)?;
        Ok(Self::build(MemoryStore::from_snapshot(snapshot), HashMap::new()))
    }

    /// Save the current state to encrypted bytes.
    /// Returns raw bytes that the frontend can write to a file.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self, password: &str) -> Result<Vec<u8>, CoreError> {
        let snapshot = self.store.snapshot()?;
        let bytes = StorageManager::save_to_bytes(&snapshot, password)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Load from an encrypted file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, password: &str) -> Result<Self, CoreError> {
        let snapshot = StorageManager::load_from_file(path, password)?;
        Ok(Self::build(MemoryStore::from_snapshot(snapshot), HashMap::new()))
    }

    /// Save to an encrypted file on disk (native only, not WASM).
    /// Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str, password: &str) -> Result<(), CoreError> {
        let snapshot = self.store.snapshot()?;
        StorageManager::save_to_file(&snapshot, path, password)?;
        self.dirty = false;
        Ok(())
    }

    // ── Accounts ────────────────────────────────────────────────────

    /// Register a new account with the default $10,000 cash grant.
    pub fn register_account(&mut self, username: &str) -> Result<Account, CoreError> {
        let account = self.account_service.register(&self.store, username)?;
        self.dirty = true;
        Ok(account)
    }

    /// Register a new account with a custom starting balance.
    pub fn register_account_with_cash(
        &mut self,
        username: &str,
        starting_cash: f64,
    ) -> Result<Account, CoreError> {
        let account =
            self.account_service
                .register_with_cash(&self.store, username, starting_cash)?;
        self.dirty = true;
        Ok(account)
    }

    /// Get an account by id.
    pub fn account(&self, account_id: Uuid) -> Result<Account, CoreError> {
        self.store.get_account(account_id)
    }

    /// Find an account by username (exact match).
    pub fn find_account(&self, username: &str) -> Result<Option<Account>, CoreError> {
        self.store.find_account(username)
    }

    /// Delete an account and everything it owns (holdings, history,
    /// watchlists).
    pub fn delete_account(&mut self, account_id: Uuid) -> Result<(), CoreError> {
        self.account_service.delete(&self.store, account_id)?;
        self.dirty = true;
        Ok(())
    }

    // ── Trading ─────────────────────────────────────────────────────

    /// Fetch a fresh quote and buy `shares` of `symbol`.
    pub async fn buy(
        &mut self,
        account_id: Uuid,
        symbol: &str,
        shares: u32,
    ) -> Result<TradeReceipt, CoreError> {
        let quote = self.quote_service.lookup(symbol).await?;
        self.buy_with_quote(account_id, shares, &quote)
    }

    /// Buy against a quote the caller already fetched. The quote is
    /// good for this one call only.
    pub fn buy_with_quote(
        &mut self,
        account_id: Uuid,
        shares: u32,
        quote: &Quote,
    ) -> Result<TradeReceipt, CoreError> {
        let receipt = self
            .trading_service
            .buy(&self.store, account_id, shares, quote)?;
        self.dirty = true;
        Ok(receipt)
    }

    /// Fetch a fresh quote and sell `shares` of `symbol`.
    pub async fn sell(
        &mut self,
        account_id: Uuid,
        symbol: &str,
        shares: u32,
    ) -> Result<TradeReceipt, CoreError> {
        let quote = self.quote_service.lookup(symbol).await?;
        self.sell_with_quote(account_id, shares, &quote)
    }

    /// Sell against a quote the caller already fetched.
    pub fn sell_with_quote(
        &mut self,
        account_id: Uuid,
        shares: u32,
        quote: &Quote,
    ) -> Result<TradeReceipt, CoreError> {
        let receipt = self
            .trading_service
            .sell(&self.store, account_id, shares, quote)?;
        self.dirty = true;
        Ok(receipt)
    }

    // ── Quotes & Valuation ──────────────────────────────────────────

    /// Look up the latest quote for a symbol.
    pub async fn quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        self.quote_service.lookup(symbol).await
    }

    /// Value every position of an account at current prices.
    /// Fetches one quote per held symbol concurrently; fails as a whole
    /// if any symbol cannot be quoted.
    pub async fn portfolio(&self, account_id: Uuid) -> Result<PortfolioValuation, CoreError> {
        self.valuation_service
            .value_portfolio(&self.store, &self.quote_service, account_id)
            .await
    }

    /// All holdings of an account, sorted by symbol.
    pub fn holdings(&self, account_id: Uuid) -> Result<Vec<Holding>, CoreError> {
        self.store.holdings(account_id)
    }

    /// The holding for one symbol, if any.
    pub fn holding(&self, account_id: Uuid, symbol: &str) -> Result<Option<Holding>, CoreError> {
        self.store.holding(account_id, symbol)
    }

    // ── History ─────────────────────────────────────────────────────

    /// Full trade history, newest first.
    pub fn history(&self, account_id: Uuid) -> Result<Vec<TradeRecord>, CoreError> {
        self.account_service.history(&self.store, account_id)
    }

    /// Trade history for one symbol, newest first.
    pub fn history_for_symbol(
        &self,
        account_id: Uuid,
        symbol: &str,
    ) -> Result<Vec<TradeRecord>, CoreError> {
        self.account_service
            .history_for_symbol(&self.store, account_id, symbol)
    }

    /// Trade history filtered by kind, newest first.
    pub fn history_by_kind(
        &self,
        account_id: Uuid,
        kind: TradeKind,
    ) -> Result<Vec<TradeRecord>, CoreError> {
        self.account_service
            .history_by_kind(&self.store, account_id, kind)
    }

    // ── Watchlists ──────────────────────────────────────────────────

    /// All watchlists of an account.
    pub fn watchlists(&self, account_id: Uuid) -> Result<Vec<Watchlist>, CoreError> {
        self.store.watchlists(account_id)
    }

    /// Create a new, empty watchlist.
    pub fn create_watchlist(
        &mut self,
        account_id: Uuid,
        name: &str,
    ) -> Result<Watchlist, CoreError> {
        let list = self.watchlist_service.create(&self.store, account_id, name)?;
        self.dirty = true;
        Ok(list)
    }

    /// Rename a watchlist.
    pub fn rename_watchlist(
        &mut self,
        account_id: Uuid,
        list_id: Uuid,
        new_name: &str,
    ) -> Result<(), CoreError> {
        self.watchlist_service
            .rename(&self.store, account_id, list_id, new_name)?;
        self.dirty = true;
        Ok(())
    }

    /// Delete a watchlist and its entries.
    pub fn delete_watchlist(&mut self, account_id: Uuid, list_id: Uuid) -> Result<(), CoreError> {
        self.watchlist_service
            .delete(&self.store, account_id, list_id)?;
        self.dirty = true;
        Ok(())
    }

    /// Add a ticker to a watchlist.
    pub fn add_favourite(
        &mut self,
        account_id: Uuid,
        list_id: Uuid,
        symbol: &str,
        company: &str,
    ) -> Result<(), CoreError> {
        self.watchlist_service
            .add_favourite(&self.store, account_id, list_id, symbol, company)?;
        self.dirty = true;
        Ok(())
    }

    /// Remove a ticker from a watchlist.
    pub fn remove_favourite(
        &mut self,
        account_id: Uuid,
        list_id: Uuid,
        symbol: &str,
    ) -> Result<(), CoreError> {
        self.watchlist_service
            .remove_favourite(&self.store, account_id, list_id, symbol)?;
        self.dirty = true;
        Ok(())
    }

    /// Make `symbol` a member of exactly the given lists: added where
    /// missing, removed everywhere else.
    pub fn set_favourite_lists(
        &mut self,
        account_id: Uuid,
        symbol: &str,
        company: &str,
        member_of: &HashSet<Uuid>,
    ) -> Result<(), CoreError> {
        self.watchlist_service
            .set_favourite_lists(&self.store, account_id, symbol, company, member_of)?;
        self.dirty = true;
        Ok(())
    }

    /// Ids of the lists currently containing a symbol.
    pub fn lists_containing(
        &self,
        account_id: Uuid,
        symbol: &str,
    ) -> Result<HashSet<Uuid>, CoreError> {
        self.watchlist_service
            .lists_containing(&self.store, account_id, symbol)
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Export an account's trade history as a JSON string.
    pub fn export_history_to_json(&self, account_id: Uuid) -> Result<String, CoreError> {
        let trades = self.account_service.history(&self.store, account_id)?;
        serde_json::to_string_pretty(&trades)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize history: {e}")))
    }

    /// Export an account's trade history as a CSV string.
    /// Columns: id, kind, symbol, company, shares, price, executed_at
    pub fn export_history_to_csv(&self, account_id: Uuid) -> Result<String, CoreError> {
        let trades = self.account_service.history(&self.store, account_id)?;
        let mut csv = String::from("id,kind,symbol,company,shares,price,executed_at\n");
        for trade in &trades {
            // Escape CSV: quote fields containing commas, quotes, or newlines
            let company = if trade.company.contains(',')
                || trade.company.contains('"')
                || trade.company.contains('\n')
            {
                format!("\"{}\"", trade.company.replace('"', "\"\""))
            } else {
                trade.company.clone()
            };
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                trade.id,
                trade.kind,
                trade.symbol,
                company,
                trade.shares,
                trade.price,
                trade.executed_at.to_rfc3339(),
            ));
        }
        Ok(csv)
    }

    // ── Settings & Providers ────────────────────────────────────────

    /// Set an API key for a provider (e.g., "alphavantage").
    /// Rebuilds the provider registry so the new key takes effect immediately.
    pub fn set_api_key(&mut self, provider: String, key: String) {
        self.api_keys.insert(provider, key);
        let registry = QuoteProviderRegistry::new_with_defaults(&self.api_keys);
        self.quote_service = QuoteService::new(registry);
        self.dirty = true;
    }

    /// Remove an API key for a provider.
    /// Rebuilds the provider registry so the removal takes effect immediately.
    pub fn remove_api_key(&mut self, provider: &str) -> bool {
        let removed = self.api_keys.remove(provider).is_some();
        if removed {
            let registry = QuoteProviderRegistry::new_with_defaults(&self.api_keys);
            self.quote_service = QuoteService::new(registry);
            self.dirty = true;
        }
        removed
    }

    /// Check if at least one quote provider is available.
    #[must_use]
    pub fn has_quote_provider(&self) -> bool {
        self.quote_service.has_provider()
    }

    /// Names of the registered quote providers, in fallback order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        self.quote_service.provider_names()
    }

    // ── Password & Dirty State ──────────────────────────────────────

    /// Re-encrypt the store with a new password.
    /// Returns the encrypted bytes. The caller should write them to storage.
    ///
    /// `last_saved_bytes` must be the most recently saved encrypted
    /// bytes. The current password is verified by decrypting them; if
    /// verification fails, returns `CoreError::Decryption`.
    pub fn change_password(
        &mut self,
        last_saved_bytes: &[u8],
        current_password: &str,
        new_password: &str,
    ) -> Result<Vec<u8>, CoreError> {
        // Verify the current password against the actual saved data.
        StorageManager::load_from_bytes(last_saved_bytes, current_password)?;

        let snapshot = self.store.snapshot()?;
        let new_bytes = StorageManager::save_to_bytes(&snapshot, new_password)?;
        self.dirty = false;
        Ok(new_bytes)
    }

    /// Returns `true` if any state has been modified since the last
    /// save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(store: MemoryStore, api_keys: HashMap<String, String>) -> Self {
        let registry = QuoteProviderRegistry::new_with_defaults(&api_keys);
        Self {
            store,
            quote_service: QuoteService::new(registry),
            trading_service: TradingService::new(),
            valuation_service: ValuationService::new(),
            account_service: AccountService::new(),
            watchlist_service: WatchlistService::new(),
            api_keys,
            dirty: false,
        }
    }
}
