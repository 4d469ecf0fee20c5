use serde::{Deserialize, Serialize};

/// A position in one stock, owned by exactly one account.
///
/// Invariants maintained by the store and trading service:
/// - at most one holding per (account, symbol) pair;
/// - `shares` is always > 0 — a holding sold down to zero is deleted,
///   never persisted as an empty row;
/// - `mean_price` is the weighted-average cost basis per share. It is
///   recomputed on every purchase and left untouched by partial sales
///   (the average cost of the shares you still hold does not change
///   when you sell some of them).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol, uppercased (e.g., "AAPL")
    pub symbol: String,

    /// Company name at the time of the first purchase (e.g., "Apple Inc.")
    pub company: String,

    /// Number of shares held, always positive
    pub shares: u32,

    /// Weighted-average price paid per share
    pub mean_price: f64,

    /// Last quote price seen during a portfolio valuation.
    /// Display-only cache; may be stale or absent.
    #[serde(default)]
    pub last_price: Option<f64>,

    /// Last computed market value (`shares * last_price`).
    /// Display-only cache; may be stale or absent.
    #[serde(default)]
    pub last_total: Option<f64>,
}

impl Holding {
    /// Open a new position from a first purchase. The cost basis of a
    /// brand new holding is simply the executed price.
    pub fn open(
        symbol: impl Into<String>,
        company: impl Into<String>,
        shares: u32,
        price: f64,
    ) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            company: company.into(),
            shares,
            mean_price: price,
            last_price: None,
            last_total: None,
        }
    }

    /// Fold a top-up purchase into the position: the cost basis becomes
    /// the shares-weighted mean of the old lot and the new lot:
    ///
    /// `new_mean = (old_mean * old_shares + shares * price) / (old_shares + shares)`
    pub fn absorb_purchase(&mut self, shares: u32, price: f64) {
        let old_shares = f64::from(self.shares);
        let added = f64::from(shares);
        self.mean_price = (self.mean_price * old_shares + added * price) / (old_shares + added);
        self.shares += shares;
    }

    /// Total amount paid for the current position (`shares * mean_price`).
    #[must_use]
    pub fn cost_basis(&self) -> f64 {
        f64::from(self.shares) * self.mean_price
    }
}
