use chrono::Utc;
use futures::future::try_join_all;
use uuid::Uuid;

use super::quote_service::QuoteService;
use crate::errors::CoreError;
use crate::models::valuation::{PortfolioValuation, PositionValuation};
use crate::store::PortfolioStore;

/// Computes the current market value of a whole portfolio.
///
/// Quote fetches for the held symbols run concurrently and are joined
/// before anything is aggregated — the total is computed from a
/// complete set of fresh quotes or not at all. If any single lookup
/// fails the valuation fails with that error rather than reporting a
/// misleadingly low total from the symbols that happened to resolve.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Value every position of an account at current prices.
    ///
    /// Read-only, except for a best-effort refresh of each holding's
    /// cached display price; dropping that write loses nothing.
    pub async fn value_portfolio(
        &self,
        store: &dyn PortfolioStore,
        quotes: &QuoteService,
        account_id: Uuid,
    ) -> Result<PortfolioValuation, CoreError> {
        let account = store.get_account(account_id)?;
        let holdings = store.holdings(account_id)?;

        // One concurrent lookup per held symbol; holdings are unique by
        // symbol so there is nothing to deduplicate. try_join_all is a
        // barrier: aggregation starts only once every fetch resolved.
        let fetches = holdings.iter().map(|h| quotes.lookup(&h.symbol));
        let fetched = try_join_all(fetches).await?;

        let mut positions = Vec::with_capacity(holdings.len());
        let mut grand_total = 0.0;
        let mut cost_basis_total = 0.0;

        for (holding, quote) in holdings.iter().zip(&fetched) {
            let shares = f64::from(holding.shares);
            let market_value = shares * quote.price;
            grand_total += market_value;
            cost_basis_total += holding.cost_basis();

            positions.push(PositionValuation {
                symbol: holding.symbol.clone(),
                company: holding.company.clone(),
                shares: holding.shares,
                mean_price: holding.mean_price,
                price: quote.price,
                market_value,
                unrealized_delta: shares * (quote.price - holding.mean_price),
            });
        }

        // Advisory display cache; a failed write is logged and ignored.
        for position in &positions {
            if let Err(e) = store.cache_position_value(
                account_id,
                &position.symbol,
                position.price,
                position.market_value,
            ) {
                log::debug!("skipping display-cache update for {}: {e}", position.symbol);
            }
        }

        Ok(PortfolioValuation {
            as_of: Utc::now(),
            cash: account.cash,
            grand_total,
            cost_basis_total,
            difference: cost_basis_total - grand_total,
            positions,
        })
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
