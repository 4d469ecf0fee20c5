use std::collections::HashSet;

use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::watchlist::{WatchEntry, Watchlist};
use crate::store::PortfolioStore;

/// Favourite-ticker bookkeeping: named per-account lists of symbols.
///
/// Pure CRUD; the only rules are that list names are unique per account
/// and a symbol appears at most once per list.
pub struct WatchlistService;

impl WatchlistService {
    pub fn new() -> Self {
        Self
    }

    /// Create a new, empty watchlist.
    pub fn create(
        &self,
        store: &dyn PortfolioStore,
        account_id: Uuid,
        name: &str,
    ) -> Result<Watchlist, CoreError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::ValidationError(
                "Watchlist name must not be empty".into(),
            ));
        }
        let existing = store.watchlists(account_id)?;
        if existing.iter().any(|l| l.name == trimmed) {
            return Err(CoreError::ValidationError(format!(
                "A watchlist named '{trimmed}' already exists"
            )));
        }

        let list = Watchlist::new(trimmed);
        store.create_watchlist(account_id, list.clone())?;
        Ok(list)
    }

    /// Rename an existing watchlist.
    pub fn rename(
        &self,
        store: &dyn PortfolioStore,
        account_id: Uuid,
        list_id: Uuid,
        new_name: &str,
    ) -> Result<(), CoreError> {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::ValidationError(
                "Watchlist name must not be empty".into(),
            ));
        }
        let lists = store.watchlists(account_id)?;
        if lists.iter().any(|l| l.name == trimmed && l.id != list_id) {
            return Err(CoreError::ValidationError(format!(
                "A watchlist named '{trimmed}' already exists"
            )));
        }
        let mut list = Self::find(&lists, list_id)?;
        list.name = trimmed.to_string();
        store.update_watchlist(account_id, list)
    }

    /// Delete a watchlist and all its entries.
    pub fn delete(
        &self,
        store: &dyn PortfolioStore,
        account_id: Uuid,
        list_id: Uuid,
    ) -> Result<(), CoreError> {
        store.delete_watchlist(account_id, list_id)
    }

    /// Add a ticker to a list. Rejects duplicates within the same list.
    pub fn add_favourite(
        &self,
        store: &dyn PortfolioStore,
        account_id: Uuid,
        list_id: Uuid,
        symbol: &str,
        company: &str,
    ) -> Result<(), CoreError> {
        let lists = store.watchlists(account_id)?;
        let mut list = Self::find(&lists, list_id)?;
        if list.contains(symbol) {
            return Err(CoreError::ValidationError(format!(
                "{} is already in '{}'",
                symbol.to_uppercase(),
                list.name
            )));
        }
        list.entries.push(WatchEntry::new(symbol, company));
        store.update_watchlist(account_id, list)
    }

    /// Remove a ticker from a list. Removing a symbol that is not in
    /// the list is a no-op.
    pub fn remove_favourite(
        &self,
        store: &dyn PortfolioStore,
        account_id: Uuid,
        list_id: Uuid,
        symbol: &str,
    ) -> Result<(), CoreError> {
        let upper = symbol.to_uppercase();
        let lists = store.watchlists(account_id)?;
        let mut list = Self::find(&lists, list_id)?;
        list.entries.retain(|e| e.symbol != upper);
        store.update_watchlist(account_id, list)
    }

    /// Reconcile which lists contain a symbol against a desired set.
    ///
    /// After this call the symbol is in exactly the lists named by
    /// `member_of`: it is added where missing and removed from every
    /// other list of the account. Unknown list ids are ignored.
    pub fn set_favourite_lists(
        &self,
        store: &dyn PortfolioStore,
        account_id: Uuid,
        symbol: &str,
        company: &str,
        member_of: &HashSet<Uuid>,
    ) -> Result<(), CoreError> {
        let upper = symbol.to_uppercase();
        for mut list in store.watchlists(account_id)? {
            let wanted = member_of.contains(&list.id);
            let present = list.contains(&upper);
            if wanted == present {
                continue;
            }
            if wanted {
                list.entries.push(WatchEntry::new(&upper, company));
            } else {
                list.entries.retain(|e| e.symbol != upper);
            }
            store.update_watchlist(account_id, list)?;
        }
        Ok(())
    }

    /// Ids of the lists that currently contain a symbol.
    pub fn lists_containing(
        &self,
        store: &dyn PortfolioStore,
        account_id: Uuid,
        symbol: &str,
    ) -> Result<HashSet<Uuid>, CoreError> {
        let upper = symbol.to_uppercase();
        Ok(store
            .watchlists(account_id)?
            .into_iter()
            .filter(|l| l.contains(&upper))
            .map(|l| l.id)
            .collect())
    }

    fn find(lists: &[Watchlist], list_id: Uuid) -> Result<Watchlist, CoreError> {
        lists
            .iter()
            .find(|l| l.id == list_id)
            .cloned()
            .ok_or_else(|| CoreError::WatchlistNotFound(list_id.to_string()))
    }
}

impl Default for WatchlistService {
    fn default() -> Self {
        Self::new()
    }
}
