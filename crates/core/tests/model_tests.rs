// ═══════════════════════════════════════════════════════════════════
// Model Tests — Holding arithmetic, Quote validation, TradeRecord,
// Watchlist membership
// ═══════════════════════════════════════════════════════════════════

use paper_trader_core::errors::CoreError;
use paper_trader_core::models::account::{Account, DEFAULT_STARTING_CASH};
use paper_trader_core::models::holding::Holding;
use paper_trader_core::models::quote::Quote;
use paper_trader_core::models::trade::{TradeKind, TradeRecord};
use paper_trader_core::models::watchlist::{WatchEntry, Watchlist};

// ═══════════════════════════════════════════════════════════════════
// Holding
// ═══════════════════════════════════════════════════════════════════

#[test]
fn open_uppercases_symbol_and_sets_basis_to_price() {
    let holding = Holding::open("aapl", "Apple Inc.", 10, 185.5);
    assert_eq!(holding.symbol, "AAPL");
    assert_eq!(holding.shares, 10);
    assert_eq!(holding.mean_price, 185.5);
    assert!(holding.last_price.is_none());
}

#[test]
fn absorb_purchase_computes_shares_weighted_mean() {
    let mut holding = Holding::open("ABC", "ABC Corp.", 10, 50.0);
    holding.absorb_purchase(10, 70.0);
    assert_eq!(holding.shares, 20);
    assert!((holding.mean_price - 60.0).abs() < 1e-9);
}

#[test]
fn absorb_purchase_weights_by_lot_size() {
    let mut holding = Holding::open("ABC", "ABC Corp.", 30, 10.0);
    holding.absorb_purchase(10, 50.0);
    // (30*10 + 10*50) / 40 = 20
    assert_eq!(holding.shares, 40);
    assert!((holding.mean_price - 20.0).abs() < 1e-9);
}

#[test]
fn absorb_purchase_at_same_price_keeps_mean() {
    let mut holding = Holding::open("ABC", "ABC Corp.", 10, 50.0);
    holding.absorb_purchase(25, 50.0);
    assert_eq!(holding.shares, 35);
    assert!((holding.mean_price - 50.0).abs() < 1e-9);
}

#[test]
fn cost_basis_is_shares_times_mean() {
    let holding = Holding::open("ABC", "ABC Corp.", 12, 7.25);
    assert!((holding.cost_basis() - 87.0).abs() < 1e-9);
}

#[test]
fn repeated_absorbs_preserve_total_invested() {
    let mut holding = Holding::open("ABC", "ABC Corp.", 1, 3.14);
    let mut invested = 3.14;
    for i in 1..=50u32 {
        let price = 3.14 + f64::from(i) * 0.77;
        holding.absorb_purchase(i, price);
        invested += f64::from(i) * price;
    }
    assert!((holding.cost_basis() - invested).abs() < 1e-6);
}

// ═══════════════════════════════════════════════════════════════════
// Quote
// ═══════════════════════════════════════════════════════════════════

#[test]
fn quote_new_uppercases_symbol() {
    let quote = Quote::new("msft", "Microsoft Corporation", 420.0, -1.2);
    assert_eq!(quote.symbol, "MSFT");
    assert_eq!(quote.change, -1.2);
}

#[test]
fn valid_quote_passes_validation() {
    assert!(Quote::new("A", "A Corp.", 0.01, 0.0).validate().is_ok());
}

#[test]
fn invalid_prices_fail_validation() {
    for price in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = Quote::new("A", "A Corp.", price, 0.0).validate().unwrap_err();
        assert!(
            matches!(err, CoreError::QuoteUnavailable { .. }),
            "price {price} should be rejected"
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
// TradeRecord & Account
// ═══════════════════════════════════════════════════════════════════

#[test]
fn trade_record_uppercases_symbol() {
    let trade = TradeRecord::new(TradeKind::Purchase, "tsla", "Tesla, Inc.", 2, 250.0);
    assert_eq!(trade.symbol, "TSLA");
    assert_eq!(trade.kind, TradeKind::Purchase);
}

#[test]
fn trade_kind_display_matches_history_labels() {
    assert_eq!(TradeKind::Purchase.to_string(), "Purchase");
    assert_eq!(TradeKind::Sale.to_string(), "Sale");
}

#[test]
fn new_account_starts_at_version_zero() {
    let account = Account::new("alice", DEFAULT_STARTING_CASH);
    assert_eq!(account.cash, 10_000.0);
    assert_eq!(account.version, 0);
}

#[test]
fn trade_record_serializes_round_trip() {
    let trade = TradeRecord::new(TradeKind::Sale, "AAPL", "Apple Inc.", 5, 185.0);
    let json = serde_json::to_string(&trade).unwrap();
    let back: TradeRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(trade, back);
}

// ═══════════════════════════════════════════════════════════════════
// Watchlist
// ═══════════════════════════════════════════════════════════════════

#[test]
fn watchlist_membership_is_case_insensitive() {
    let mut list = Watchlist::new("tech");
    list.entries.push(WatchEntry::new("aapl", "Apple Inc."));

    assert!(list.contains("AAPL"));
    assert!(list.contains("aapl"));
    assert!(!list.contains("MSFT"));
}

#[test]
fn watch_entry_uppercases_symbol() {
    let entry = WatchEntry::new("nvda", "NVIDIA Corporation");
    assert_eq!(entry.symbol, "NVDA");
}
