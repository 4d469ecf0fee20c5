use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time valuation of a whole portfolio.
///
/// Produced by a read-only pass over the account's holdings with one
/// fresh quote per held symbol. Either every symbol was quoted
/// successfully or the valuation failed as a whole — a total computed
/// from a subset of holdings would silently understate the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    /// When the valuation was computed
    pub as_of: DateTime<Utc>,

    /// Cash balance at valuation time
    pub cash: f64,

    /// Sum of all position market values
    pub grand_total: f64,

    /// Sum of `shares * mean_price` over all positions
    pub cost_basis_total: f64,

    /// `cost_basis_total - grand_total`: positive means the holdings
    /// are worth less than what was paid for them
    pub difference: f64,

    /// Per-position breakdown, one entry per held symbol
    pub positions: Vec<PositionValuation>,
}

impl PortfolioValuation {
    /// Cash plus market value of all positions.
    #[must_use]
    pub fn net_worth(&self) -> f64 {
        self.cash + self.grand_total
    }
}

/// Valuation of a single position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionValuation {
    /// Ticker symbol
    pub symbol: String,

    /// Company name
    pub company: String,

    /// Shares held
    pub shares: u32,

    /// Weighted-average price paid per share
    pub mean_price: f64,

    /// Quoted price used for this valuation
    pub price: f64,

    /// `shares * price`
    pub market_value: f64,

    /// Paper gain/loss: `shares * (price - mean_price)`
    pub unrealized_delta: f64,
}
