use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Starting cash granted to every newly registered account.
pub const DEFAULT_STARTING_CASH: f64 = 10_000.0;

/// A simulated trading account.
///
/// The cash balance is the only field mutated by trades, and it is never
/// allowed to go negative: affordability is checked before any mutation.
/// `version` is bumped by the store on every committed trade and is used
/// to detect lost-update races between concurrent operations on the
/// same account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: Uuid,

    /// Login/display name, unique across the store
    pub username: String,

    /// Virtual cash balance in USD
    pub cash: f64,

    /// Optimistic-concurrency token, bumped on every committed trade
    pub version: u64,

    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(username: impl Into<String>, starting_cash: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            cash: starting_cash,
            version: 0,
            created_at: Utc::now(),
        }
    }
}
