use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::quote::Quote;
use crate::models::trade::{TradeKind, TradeReceipt, TradeRecord};
use crate::store::{HoldingChange, PortfolioStore, TradeCommit};

/// Executes simulated purchases and sales against an account.
///
/// Pure orchestration over the store — no I/O of its own. All
/// validation happens before any mutation, and the cash debit/credit,
/// the holding upsert/delete and the history append are handed to the
/// store as one atomic commit. A holding only ever moves through:
/// no position → open (first purchase) → open (top-up / partial sale)
/// → no position (full sale).
pub struct TradingService;

impl TradingService {
    pub fn new() -> Self {
        Self
    }

    /// Buy `shares` of the quoted symbol.
    ///
    /// Debits cash by exactly `shares * quote.price`. A first purchase
    /// opens the position at the quoted price; a repeat purchase folds
    /// the new lot into the weighted-average cost basis. If another
    /// operation committed between our read and our commit, the whole
    /// operation is re-read and retried once before giving up.
    pub fn buy(
        &self,
        store: &dyn PortfolioStore,
        account_id: Uuid,
        shares: u32,
        quote: &Quote,
    ) -> Result<TradeReceipt, CoreError> {
        Self::with_one_retry(|| self.try_buy(store, account_id, shares, quote))
    }

    /// Sell `shares` of the quoted symbol.
    ///
    /// Credits cash by exactly `shares * quote.price`. Selling the
    /// entire position deletes the holding — its cost basis is
    /// discarded, a later re-purchase starts fresh. A partial sale
    /// leaves `mean_price` untouched: selling shares does not change
    /// the average price paid for the ones you keep. The realized
    /// gain/loss on the sold lot is reported in the receipt.
    pub fn sell(
        &self,
        store: &dyn PortfolioStore,
        account_id: Uuid,
        shares: u32,
        quote: &Quote,
    ) -> Result<TradeReceipt, CoreError> {
        Self::with_one_retry(|| self.try_sell(store, account_id, shares, quote))
    }

    fn try_buy(
        &self,
        store: &dyn PortfolioStore,
        account_id: Uuid,
        shares: u32,
        quote: &Quote,
    ) -> Result<TradeReceipt, CoreError> {
        if shares == 0 {
            return Err(CoreError::InvalidShareCount);
        }
        quote.validate()?;

        let account = store.get_account(account_id)?;
        let cost = f64::from(shares) * quote.price;
        if account.cash < cost {
            return Err(CoreError::InsufficientFunds {
                required: cost,
                available: account.cash,
            });
        }

        let updated = match store.holding(account_id, &quote.symbol)? {
            None => Holding::open(&quote.symbol, &quote.company, shares, quote.price),
            Some(mut held) => {
                // The combined position must still fit in a u32.
                if held.shares.checked_add(shares).is_none() {
                    return Err(CoreError::InvalidShareCount);
                }
                held.absorb_purchase(shares, quote.price);
                held
            }
        };
        let shares_after = updated.shares;

        let trade = TradeRecord::new(
            TradeKind::Purchase,
            &quote.symbol,
            &quote.company,
            shares,
            quote.price,
        );
        let cash_after = account.cash - cost;

        store.commit_trade(TradeCommit {
            account_id,
            expected_version: account.version,
            new_cash: cash_after,
            holding_change: HoldingChange::Upsert(updated),
            trade: trade.clone(),
        })?;

        log::debug!(
            "account {account_id}: bought {shares} {} @ {}",
            quote.symbol,
            quote.price
        );

        Ok(TradeReceipt {
            trade,
            cash_after,
            shares_after,
            realized_pnl: None,
        })
    }

    fn try_sell(
        &self,
        store: &dyn PortfolioStore,
        account_id: Uuid,
        shares: u32,
        quote: &Quote,
    ) -> Result<TradeReceipt, CoreError> {
        if shares == 0 {
            return Err(CoreError::InvalidShareCount);
        }
        quote.validate()?;

        let account = store.get_account(account_id)?;
        let held = store.holding(account_id, &quote.symbol)?.ok_or_else(|| {
            CoreError::InsufficientShares {
                symbol: quote.symbol.clone(),
                requested: shares,
                held: 0,
            }
        })?;

        if shares > held.shares {
            return Err(CoreError::InsufficientShares {
                symbol: quote.symbol.clone(),
                requested: shares,
                held: held.shares,
            });
        }

        let realized = f64::from(shares) * (quote.price - held.mean_price);

        let (holding_change, shares_after) = if shares == held.shares {
            (HoldingChange::Remove(held.symbol.clone()), 0)
        } else {
            let mut remaining = held;
            remaining.shares -= shares;
            let left = remaining.shares;
            (HoldingChange::Upsert(remaining), left)
        };

        let trade = TradeRecord::new(
            TradeKind::Sale,
            &quote.symbol,
            &quote.company,
            shares,
            quote.price,
        );
        let cash_after = account.cash + f64::from(shares) * quote.price;

        store.commit_trade(TradeCommit {
            account_id,
            expected_version: account.version,
            new_cash: cash_after,
            holding_change,
            trade: trade.clone(),
        })?;

        log::debug!(
            "account {account_id}: sold {shares} {} @ {} (realized {realized:.2})",
            quote.symbol,
            quote.price
        );

        Ok(TradeReceipt {
            trade,
            cash_after,
            shares_after,
            realized_pnl: Some(realized),
        })
    }

    /// Run an operation, retrying exactly once if a concurrent commit
    /// beat it to the account. The retry re-reads all state, so the
    /// second attempt validates against fresh balances.
    fn with_one_retry<T>(
        mut op: impl FnMut() -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        match op() {
            Err(CoreError::ConcurrentModification) => op(),
            other => other,
        }
    }
}

impl Default for TradingService {
    fn default() -> Self {
        Self::new()
    }
}
