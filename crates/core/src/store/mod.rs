pub mod memory;

use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::account::Account;
use crate::models::holding::Holding;
use crate::models::trade::TradeRecord;
use crate::models::watchlist::Watchlist;

/// The holding-side effect of a trade.
#[derive(Debug, Clone, PartialEq)]
pub enum HoldingChange {
    /// Create or replace the holding for this symbol
    Upsert(Holding),
    /// Delete the holding for this symbol (full liquidation)
    Remove(String),
}

/// The complete effect of one trade, applied atomically.
///
/// The cash write, the holding upsert/delete and the trade-log append
/// are a single unit: either all of them land or none of them do.
/// `expected_version` must match the account's current version or the
/// commit is rejected with `ConcurrentModification` — two operations
/// racing on the same account cannot both apply against the same
/// pre-trade cash balance.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeCommit {
    pub account_id: Uuid,
    pub expected_version: u64,
    pub new_cash: f64,
    pub holding_change: HoldingChange,
    pub trade: TradeRecord,
}

/// Persistent storage for accounts, holdings, trade history and
/// watchlists.
///
/// Reads return owned snapshots; the only mutation path for trading
/// state is `commit_trade`. An account exclusively owns its holdings,
/// trades and watchlists — deleting the account removes all of them as
/// one explicit step, there are no implicit relationship callbacks.
pub trait PortfolioStore: Send + Sync {
    // ── Accounts ────────────────────────────────────────────────────

    /// Create a new account. Fails with `DuplicateUsername` if the
    /// username is already taken.
    fn create_account(&self, account: Account) -> Result<(), CoreError>;

    /// Fetch an account by id.
    fn get_account(&self, account_id: Uuid) -> Result<Account, CoreError>;

    /// Find an account by username (exact match).
    fn find_account(&self, username: &str) -> Result<Option<Account>, CoreError>;

    /// Delete an account and everything it owns: holdings, trade
    /// history and watchlists.
    fn delete_account(&self, account_id: Uuid) -> Result<(), CoreError>;

    /// Ids of all stored accounts.
    fn account_ids(&self) -> Result<Vec<Uuid>, CoreError>;

    // ── Holdings ────────────────────────────────────────────────────

    /// All holdings of an account, sorted by symbol.
    fn holdings(&self, account_id: Uuid) -> Result<Vec<Holding>, CoreError>;

    /// The holding for one symbol, if the account has an open position.
    fn holding(&self, account_id: Uuid, symbol: &str) -> Result<Option<Holding>, CoreError>;

    // ── Trades ──────────────────────────────────────────────────────

    /// Full trade history of an account, oldest first.
    fn trades(&self, account_id: Uuid) -> Result<Vec<TradeRecord>, CoreError>;

    /// Atomically apply a trade: cash, holding and history in one unit.
    fn commit_trade(&self, commit: TradeCommit) -> Result<(), CoreError>;

    /// Best-effort write of the last-seen price and market value onto a
    /// holding, for display. Failures are tolerable; this data is
    /// advisory and recomputed on the next valuation.
    fn cache_position_value(
        &self,
        account_id: Uuid,
        symbol: &str,
        price: f64,
        total: f64,
    ) -> Result<(), CoreError>;

    // ── Watchlists ──────────────────────────────────────────────────

    /// All watchlists of an account, in creation order.
    fn watchlists(&self, account_id: Uuid) -> Result<Vec<Watchlist>, CoreError>;

    /// Create a watchlist for an account.
    fn create_watchlist(&self, account_id: Uuid, list: Watchlist) -> Result<(), CoreError>;

    /// Replace a watchlist's contents (rename, entry changes).
    fn update_watchlist(&self, account_id: Uuid, list: Watchlist) -> Result<(), CoreError>;

    /// Delete a watchlist and its entries.
    fn delete_watchlist(&self, account_id: Uuid, list_id: Uuid) -> Result<(), CoreError>;
}
