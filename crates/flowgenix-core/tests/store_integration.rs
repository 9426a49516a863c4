//! Integration tests for persistence fallbacks.

use flowgenix_core::ledger::Ledger;
use flowgenix_core::{App, Capabilities, Config, ManualClock, Settings, Store, StoreKey};

#[test]
fn corrupted_collections_fall_back_to_defaults() {
    let store = Store::open_memory().unwrap();
    for key in StoreKey::ALL {
        store.set_raw(key, "{{{ definitely not json").unwrap();
    }
    let clock = ManualClock::new(
        chrono::NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    );
    let app = App::with_parts(store, Config::default(), Capabilities::headless(), Box::new(clock))
        .unwrap();
    assert_eq!(app.state().ledger, Ledger::default());
    assert_eq!(app.state().settings, Settings::default());
    assert!(app.state().todos.is_empty());
    assert!(app.state().history.is_empty());
    assert!(app.state().user.is_none());
}

#[test]
fn wrong_shape_falls_back_too() {
    let store = Store::open_memory().unwrap();
    store.set_raw(StoreKey::Todos, r#"{"not": "a list"}"#).unwrap();
    store.set_raw(StoreKey::Stats, r#"{"coins": 12, "streak_days": 2}"#).unwrap();
    let todos: flowgenix_core::todo::TodoList = store.load(StoreKey::Todos).unwrap();
    assert!(todos.is_empty());
    let ledger: Ledger = store.load(StoreKey::Stats).unwrap();
    assert_eq!(ledger.coins(), 12);
    assert_eq!(ledger.streak_days, 2);
}

#[test]
fn store_file_is_created_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested.db");
    let store = Store::open_at(&path).unwrap();
    store.save(StoreKey::Settings, &Settings::default()).unwrap();
    assert!(path.exists());
}
