use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeKind {
    /// Buying shares
    Purchase,
    /// Selling shares
    Sale,
}

impl std::fmt::Display for TradeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeKind::Purchase => write!(f, "Purchase"),
            TradeKind::Sale => write!(f, "Sale"),
        }
    }
}

/// One entry in an account's trade history.
///
/// Records are append-only: once written they are never mutated or
/// deleted (except when the whole account is removed). The price is the
/// price actually executed against, not the cost basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Unique identifier
    pub id: Uuid,

    /// Purchase or Sale
    pub kind: TradeKind,

    /// Ticker symbol, uppercased
    pub symbol: String,

    /// Company name as quoted at execution time
    pub company: String,

    /// Number of shares traded (always positive)
    pub shares: u32,

    /// Executed price per share
    pub price: f64,

    /// When the trade executed
    pub executed_at: DateTime<Utc>,
}

impl TradeRecord {
    pub fn new(
        kind: TradeKind,
        symbol: impl Into<String>,
        company: impl Into<String>,
        shares: u32,
        price: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            symbol: symbol.into().to_uppercase(),
            company: company.into(),
            shares,
            price,
            executed_at: Utc::now(),
        }
    }
}

/// Success payload returned by a buy or sell operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeReceipt {
    /// The history entry that was appended
    pub trade: TradeRecord,

    /// Cash balance after the trade
    pub cash_after: f64,

    /// Shares of this symbol held after the trade (0 after a full sale)
    pub shares_after: u32,

    /// Realized gain/loss, only present on sales:
    /// `shares * (sale_price - mean_price)`. Computed for the caller,
    /// not persisted anywhere.
    pub realized_pnl: Option<f64>,
}
