// ═══════════════════════════════════════════════════════════════════
// Watchlist Tests — list CRUD, favourite membership, set reconciliation
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashSet;

use paper_trader_core::errors::CoreError;
use paper_trader_core::models::account::Account;
use paper_trader_core::services::watchlist_service::WatchlistService;
use paper_trader_core::store::memory::MemoryStore;
use paper_trader_core::store::PortfolioStore;

fn setup() -> (MemoryStore, uuid::Uuid, WatchlistService) {
    let store = MemoryStore::new();
    let account = Account::new("lists", 10_000.0);
    let id = account.id;
    store.create_account(account).unwrap();
    (store, id, WatchlistService::new())
}

// ═══════════════════════════════════════════════════════════════════
// List CRUD
// ═══════════════════════════════════════════════════════════════════

#[test]
fn create_rename_and_delete_a_list() {
    let (store, id, svc) = setup();

    let list = svc.create(&store, id, "tech").unwrap();
    assert_eq!(store.watchlists(id).unwrap().len(), 1);

    svc.rename(&store, id, list.id, "big tech").unwrap();
    assert_eq!(store.watchlists(id).unwrap()[0].name, "big tech");

    svc.delete(&store, id, list.id).unwrap();
    assert!(store.watchlists(id).unwrap().is_empty());
}

#[test]
fn empty_list_name_is_rejected() {
    let (store, id, svc) = setup();
    let err = svc.create(&store, id, "   ").unwrap_err();
    assert!(matches!(err, CoreError::ValidationError(_)));
}

#[test]
fn duplicate_list_name_is_rejected() {
    let (store, id, svc) = setup();
    svc.create(&store, id, "tech").unwrap();
    let err = svc.create(&store, id, "tech").unwrap_err();
    assert!(matches!(err, CoreError::ValidationError(_)));
}

#[test]
fn renaming_to_an_existing_name_is_rejected() {
    let (store, id, svc) = setup();
    svc.create(&store, id, "tech").unwrap();
    let other = svc.create(&store, id, "energy").unwrap();

    let err = svc.rename(&store, id, other.id, "tech").unwrap_err();
    assert!(matches!(err, CoreError::ValidationError(_)));
}

#[test]
fn renaming_a_list_to_its_own_name_is_allowed() {
    let (store, id, svc) = setup();
    let list = svc.create(&store, id, "tech").unwrap();
    svc.rename(&store, id, list.id, "tech").unwrap();
}

#[test]
fn operations_on_unknown_lists_fail() {
    let (store, id, svc) = setup();
    let ghost = uuid::Uuid::new_v4();

    assert!(matches!(
        svc.delete(&store, id, ghost).unwrap_err(),
        CoreError::WatchlistNotFound(_)
    ));
    assert!(matches!(
        svc.add_favourite(&store, id, ghost, "AAPL", "Apple Inc.")
            .unwrap_err(),
        CoreError::WatchlistNotFound(_)
    ));
}

// ═══════════════════════════════════════════════════════════════════
// Favourites
// ═══════════════════════════════════════════════════════════════════

#[test]
fn add_and_remove_a_favourite() {
    let (store, id, svc) = setup();
    let list = svc.create(&store, id, "tech").unwrap();

    svc.add_favourite(&store, id, list.id, "aapl", "Apple Inc.")
        .unwrap();
    assert!(store.watchlists(id).unwrap()[0].contains("AAPL"));

    svc.remove_favourite(&store, id, list.id, "AAPL").unwrap();
    assert!(!store.watchlists(id).unwrap()[0].contains("AAPL"));
}

#[test]
fn duplicate_favourite_in_one_list_is_rejected() {
    let (store, id, svc) = setup();
    let list = svc.create(&store, id, "tech").unwrap();

    svc.add_favourite(&store, id, list.id, "AAPL", "Apple Inc.")
        .unwrap();
    let err = svc
        .add_favourite(&store, id, list.id, "aapl", "Apple Inc.")
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationError(_)));
}

#[test]
fn same_symbol_may_live_in_several_lists() {
    let (store, id, svc) = setup();
    let tech = svc.create(&store, id, "tech").unwrap();
    let faves = svc.create(&store, id, "faves").unwrap();

    svc.add_favourite(&store, id, tech.id, "AAPL", "Apple Inc.")
        .unwrap();
    svc.add_favourite(&store, id, faves.id, "AAPL", "Apple Inc.")
        .unwrap();

    let containing = svc.lists_containing(&store, id, "AAPL").unwrap();
    assert_eq!(containing.len(), 2);
    assert!(containing.contains(&tech.id));
    assert!(containing.contains(&faves.id));
}

#[test]
fn removing_a_symbol_not_in_the_list_is_a_noop() {
    let (store, id, svc) = setup();
    let list = svc.create(&store, id, "tech").unwrap();
    svc.remove_favourite(&store, id, list.id, "AAPL").unwrap();
}

// ═══════════════════════════════════════════════════════════════════
// Set reconciliation
// ═══════════════════════════════════════════════════════════════════

#[test]
fn set_favourite_lists_adds_and_removes_to_match() {
    let (store, id, svc) = setup();
    let a = svc.create(&store, id, "a").unwrap();
    let b = svc.create(&store, id, "b").unwrap();
    let c = svc.create(&store, id, "c").unwrap();

    svc.add_favourite(&store, id, a.id, "AAPL", "Apple Inc.")
        .unwrap();
    svc.add_favourite(&store, id, b.id, "AAPL", "Apple Inc.")
        .unwrap();

    // Desired membership: b and c.
    let desired: HashSet<uuid::Uuid> = [b.id, c.id].into_iter().collect();
    svc.set_favourite_lists(&store, id, "AAPL", "Apple Inc.", &desired)
        .unwrap();

    let containing = svc.lists_containing(&store, id, "AAPL").unwrap();
    assert_eq!(containing, desired);
}

#[test]
fn set_favourite_lists_with_empty_set_clears_everywhere() {
    let (store, id, svc) = setup();
    let a = svc.create(&store, id, "a").unwrap();
    svc.add_favourite(&store, id, a.id, "AAPL", "Apple Inc.")
        .unwrap();

    svc.set_favourite_lists(&store, id, "AAPL", "Apple Inc.", &HashSet::new())
        .unwrap();

    assert!(svc.lists_containing(&store, id, "AAPL").unwrap().is_empty());
}

#[test]
fn set_favourite_lists_ignores_unknown_ids() {
    let (store, id, svc) = setup();
    let a = svc.create(&store, id, "a").unwrap();

    let desired: HashSet<uuid::Uuid> = [a.id, uuid::Uuid::new_v4()].into_iter().collect();
    svc.set_favourite_lists(&store, id, "AAPL", "Apple Inc.", &desired)
        .unwrap();

    let containing = svc.lists_containing(&store, id, "AAPL").unwrap();
    assert_eq!(containing.len(), 1);
    assert!(containing.contains(&a.id));
}

#[test]
fn set_favourite_lists_is_idempotent() {
    let (store, id, svc) = setup();
    let a = svc.create(&store, id, "a").unwrap();
    let desired: HashSet<uuid::Uuid> = [a.id].into_iter().collect();

    svc.set_favourite_lists(&store, id, "AAPL", "Apple Inc.", &desired)
        .unwrap();
    svc.set_favourite_lists(&store, id, "AAPL", "Apple Inc.", &desired)
        .unwrap();

    // Still exactly one entry in the list.
    assert_eq!(store.watchlists(id).unwrap()[0].entries.len(), 1);
}
