pub mod account;
pub mod holding;
pub mod quote;
pub mod trade;
pub mod valuation;
pub mod watchlist;
