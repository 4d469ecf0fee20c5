use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One favourite ticker inside a watchlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEntry {
    /// Ticker symbol, uppercased
    pub symbol: String,

    /// Company name
    pub company: String,
}

impl WatchEntry {
    pub fn new(symbol: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            company: company.into(),
        }
    }
}

/// A named list of favourite tickers, owned by one account.
///
/// Pure bookkeeping: a symbol appears at most once per list, and the
/// same symbol may appear in any number of lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watchlist {
    /// Unique identifier
    pub id: Uuid,

    /// Display name, unique per account
    pub name: String,

    /// Favourite tickers, in insertion order
    pub entries: Vec<WatchEntry>,
}

impl Watchlist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Whether this list already contains a symbol (case-insensitive).
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        let upper = symbol.to_uppercase();
        self.entries.iter().any(|e| e.symbol == upper)
    }
}
