use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::account::{Account, DEFAULT_STARTING_CASH};
use crate::models::trade::{TradeKind, TradeRecord};
use crate::store::PortfolioStore;

/// Account lifecycle and trade-history queries.
pub struct AccountService;

impl AccountService {
    pub fn new() -> Self {
        Self
    }

    /// Register a new account with the default virtual cash grant.
    pub fn register(
        &self,
        store: &dyn PortfolioStore,
        username: &str,
    ) -> Result<Account, CoreError> {
        self.register_with_cash(store, username, DEFAULT_STARTING_CASH)
    }

    /// Register a new account with a custom starting balance.
    pub fn register_with_cash(
        &self,
        store: &dyn PortfolioStore,
        username: &str,
        starting_cash: f64,
    ) -> Result<Account, CoreError> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(CoreError::ValidationError(
                "Username must not be empty".into(),
            ));
        }
        if !starting_cash.is_finite() || starting_cash < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Starting cash must be a non-negative amount, got {starting_cash}"
            )));
        }

        let account = Account::new(trimmed, starting_cash);
        store.create_account(account.clone())?;
        log::debug!("registered account {} ({})", account.username, account.id);
        Ok(account)
    }

    /// Delete an account together with its holdings, history and
    /// watchlists.
    pub fn delete(&self, store: &dyn PortfolioStore, account_id: Uuid) -> Result<(), CoreError> {
        store.delete_account(account_id)
    }

    /// Full trade history, newest first for display.
    pub fn history(
        &self,
        store: &dyn PortfolioStore,
        account_id: Uuid,
    ) -> Result<Vec<TradeRecord>, CoreError> {
        let mut trades = store.trades(account_id)?;
        trades.reverse(); // store keeps them oldest-first
        Ok(trades)
    }

    /// Trade history for one symbol (case-insensitive), newest first.
    pub fn history_for_symbol(
        &self,
        store: &dyn PortfolioStore,
        account_id: Uuid,
        symbol: &str,
    ) -> Result<Vec<TradeRecord>, CoreError> {
        let upper = symbol.to_uppercase();
        let mut trades = store.trades(account_id)?;
        trades.retain(|t| t.symbol == upper);
        trades.reverse();
        Ok(trades)
    }

    /// Trade history filtered by kind (purchases or sales), newest first.
    pub fn history_by_kind(
        &self,
        store: &dyn PortfolioStore,
        account_id: Uuid,
        kind: TradeKind,
    ) -> Result<Vec<TradeRecord>, CoreError> {
        let mut trades = store.trades(account_id)?;
        trades.retain(|t| t.kind == kind);
        trades.reverse();
        Ok(trades)
    }
}

impl Default for AccountService {
    fn default() -> Self {
        Self::new()
    }
}
