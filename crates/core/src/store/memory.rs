use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{HoldingChange, PortfolioStore, TradeCommit};
use crate::errors::CoreError;
use crate::models::account::Account;
use crate::models::holding::Holding;
use crate::models::trade::TradeRecord;
use crate::models::watchlist::Watchlist;

/// Everything one account owns, kept together so a trade commit and an
/// account delete each touch exactly one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account: Account,
    pub holdings: Vec<Holding>,
    pub trades: Vec<TradeRecord>,
    pub watchlists: Vec<Watchlist>,
}

impl AccountRecord {
    fn new(account: Account) -> Self {
        Self {
            account,
            holdings: Vec::new(),
            trades: Vec::new(),
            watchlists: Vec::new(),
        }
    }
}

/// Serializable dump of the whole store, used by the snapshot layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub accounts: Vec<AccountRecord>,
}

/// In-memory reference implementation of `PortfolioStore`.
///
/// All records live behind one `RwLock`; a trade commit holds the write
/// lock for the whole cash + holding + history update, so the three
/// writes are atomic with respect to every other operation. Version
/// checking on commit turns lost-update races into
/// `ConcurrentModification` instead of silent corruption.
pub struct MemoryStore {
    accounts: RwLock<HashMap<Uuid, AccountRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Rebuild a store from a previously exported snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let map = snapshot
            .accounts
            .into_iter()
            .map(|rec| (rec.account.id, rec))
            .collect();
        Self {
            accounts: RwLock::new(map),
        }
    }

    /// Export the full store state for persistence. Accounts are sorted
    /// by creation time so snapshots are deterministic.
    pub fn snapshot(&self) -> Result<StoreSnapshot, CoreError> {
        let guard = self.read()?;
        let mut accounts: Vec<AccountRecord> = guard.values().cloned().collect();
        accounts.sort_by_key(|rec| rec.account.created_at);
        Ok(StoreSnapshot { accounts })
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<Uuid, AccountRecord>>, CoreError> {
        self.accounts
            .read()
            .map_err(|_| CoreError::StoreUnavailable("store lock poisoned".into()))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, AccountRecord>>, CoreError> {
        self.accounts
            .write()
            .map_err(|_| CoreError::StoreUnavailable("store lock poisoned".into()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PortfolioStore for MemoryStore {
    fn create_account(&self, account: Account) -> Result<(), CoreError> {
        let mut guard = self.write()?;
        if guard
            .values()
            .any(|rec| rec.account.username == account.username)
        {
            return Err(CoreError::DuplicateUsername(account.username));
        }
        guard.insert(account.id, AccountRecord::new(account));
        Ok(())
    }

    fn get_account(&self, account_id: Uuid) -> Result<Account, CoreError> {
        let guard = self.read()?;
        guard
            .get(&account_id)
            .map(|rec| rec.account.clone())
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))
    }

    fn find_account(&self, username: &str) -> Result<Option<Account>, CoreError> {
        let guard = self.read()?;
        Ok(guard
            .values()
            .find(|rec| rec.account.username == username)
            .map(|rec| rec.account.clone()))
    }

    fn delete_account(&self, account_id: Uuid) -> Result<(), CoreError> {
        let mut guard = self.write()?;
        // Removing the record drops holdings, trades and watchlists
        // with it — the cascade is this single explicit step.
        guard
            .remove(&account_id)
            .map(|_| ())
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))
    }

    fn account_ids(&self) -> Result<Vec<Uuid>, CoreError> {
        let guard = self.read()?;
        Ok(guard.keys().copied().collect())
    }

    fn holdings(&self, account_id: Uuid) -> Result<Vec<Holding>, CoreError> {
        let guard = self.read()?;
        let rec = guard
            .get(&account_id)
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;
        let mut holdings = rec.holdings.clone();
        holdings.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(holdings)
    }

    fn holding(&self, account_id: Uuid, symbol: &str) -> Result<Option<Holding>, CoreError> {
        let upper = symbol.to_uppercase();
        let guard = self.read()?;
        let rec = guard
            .get(&account_id)
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;
        Ok(rec.holdings.iter().find(|h| h.symbol == upper).cloned())
    }

    fn trades(&self, account_id: Uuid) -> Result<Vec<TradeRecord>, CoreError> {
        let guard = self.read()?;
        let rec = guard
            .get(&account_id)
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;
        Ok(rec.trades.clone())
    }

    fn commit_trade(&self, commit: TradeCommit) -> Result<(), CoreError> {
        let mut guard = self.write()?;
        let rec = guard
            .get_mut(&commit.account_id)
            .ok_or_else(|| CoreError::AccountNotFound(commit.account_id.to_string()))?;

        if rec.account.version != commit.expected_version {
            return Err(CoreError::ConcurrentModification);
        }

        rec.account.cash = commit.new_cash;
        rec.account.version += 1;

        match commit.holding_change {
            HoldingChange::Upsert(holding) => {
                match rec.holdings.iter_mut().find(|h| h.symbol == holding.symbol) {
                    Some(existing) => *existing = holding,
                    None => rec.holdings.push(holding),
                }
            }
            HoldingChange::Remove(symbol) => {
                rec.holdings.retain(|h| h.symbol != symbol);
            }
        }

        rec.trades.push(commit.trade);
        Ok(())
    }

    fn cache_position_value(
        &self,
        account_id: Uuid,
        symbol: &str,
        price: f64,
        total: f64,
    ) -> Result<(), CoreError> {
        let mut guard = self.write()?;
        let rec = guard
            .get_mut(&account_id)
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;
        if let Some(holding) = rec.holdings.iter_mut().find(|h| h.symbol == symbol) {
            holding.last_price = Some(price);
            holding.last_total = Some(total);
        }
        Ok(())
    }

    fn watchlists(&self, account_id: Uuid) -> Result<Vec<Watchlist>, CoreError> {
        let guard = self.read()?;
        let rec = guard
            .get(&account_id)
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;
        Ok(rec.watchlists.clone())
    }

    fn create_watchlist(&self, account_id: Uuid, list: Watchlist) -> Result<(), CoreError> {
        let mut guard = self.write()?;
        let rec = guard
            .get_mut(&account_id)
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;
        rec.watchlists.push(list);
        Ok(())
    }

    fn update_watchlist(&self, account_id: Uuid, list: Watchlist) -> Result<(), CoreError> {
        let mut guard = self.write()?;
        let rec = guard
            .get_mut(&account_id)
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;
        let existing = rec
            .watchlists
            .iter_mut()
            .find(|l| l.id == list.id)
            .ok_or_else(|| CoreError::WatchlistNotFound(list.id.to_string()))?;
        *existing = list;
        Ok(())
    }

    fn delete_watchlist(&self, account_id: Uuid, list_id: Uuid) -> Result<(), CoreError> {
        let mut guard = self.write()?;
        let rec = guard
            .get_mut(&account_id)
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;
        let before = rec.watchlists.len();
        rec.watchlists.retain(|l| l.id != list_id);
        if rec.watchlists.len() == before {
            return Err(CoreError::WatchlistNotFound(list_id.to_string()));
        }
        Ok(())
    }
}
