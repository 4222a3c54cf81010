// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use billfold::store::{KvStore, MemoryStore, Retention, SqliteStore};

fn far_future() -> DateTime<Utc> {
    Utc::now() + Duration::days(365)
}

#[test]
fn sqlite_roundtrip_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.sqlite");

    let mut store = SqliteStore::open(&path).unwrap();
    store
        .save("transactions", json!([{"id": "t1", "amount": "5"}]))
        .unwrap();
    drop(store);

    let mut reopened = SqliteStore::open(&path).unwrap();
    let value = reopened.get("transactions").unwrap().unwrap();
    assert_eq!(value[0]["id"], "t1");
}

#[test]
fn get_missing_key_is_none() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    assert!(store.get("accounts").unwrap().is_none());
}

#[test]
fn save_replaces_prior_value() {
    let mut store = MemoryStore::new();
    store.save("budgets", json!({"total": "100"})).unwrap();
    store.save("budgets", json!({"total": "250"})).unwrap();
    let value = store.get("budgets").unwrap().unwrap();
    assert_eq!(value["total"], "250");
}

#[test]
fn remove_absent_key_is_ok() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.remove("bills").unwrap();
}

#[test]
fn clear_all_is_idempotent() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.save("accounts", json!([])).unwrap();
    store.clear_all().unwrap();
    store.clear_all().unwrap();
    assert!(store.get("accounts").unwrap().is_none());
}

#[test]
fn expired_entry_is_removed_on_read() {
    let retention = Retention::new().keep_for("transactions", Duration::days(7));
    let mut store = SqliteStore::open_in_memory()
        .unwrap()
        .with_retention(retention);
    store.save("transactions", json!([{"id": "t1"}])).unwrap();

    // A year later the entry is past its 7-day retention.
    store.set_clock(far_future);
    assert!(store.get("transactions").unwrap().is_none());

    // The key was deleted as a side effect, not just masked.
    store.set_clock(Utc::now);
    assert!(store.get("transactions").unwrap().is_none());
}

#[test]
fn unretained_keys_never_expire() {
    let retention = Retention::new().keep_for("transactions", Duration::days(7));
    let mut store = MemoryStore::new().with_retention(retention);
    store.save("accounts", json!([{"id": "a1"}])).unwrap();
    store.set_clock(far_future);
    assert!(store.get("accounts").unwrap().is_some());
}

#[test]
fn memory_store_expiry_matches_sqlite() {
    let retention = Retention::new().keep_for("bills", Duration::hours(1));
    let mut store = MemoryStore::new().with_retention(retention);
    store.save("bills", json!([{"id": "b1"}])).unwrap();
    store.set_clock(far_future);
    assert!(store.get("bills").unwrap().is_none());
    assert!(!store.contains_key("bills"));
}

#[test]
fn prefixed_stores_share_a_file_without_collisions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.sqlite");

    let mut alpha = SqliteStore::open(&path).unwrap().with_prefix("alpha");
    let mut beta = SqliteStore::open(&path).unwrap().with_prefix("beta");
    alpha.save("accounts", json!([{"id": "a"}])).unwrap();
    beta.save("accounts", json!([{"id": "b"}])).unwrap();

    assert_eq!(alpha.get("accounts").unwrap().unwrap()[0]["id"], "a");
    assert_eq!(beta.get("accounts").unwrap().unwrap()[0]["id"], "b");

    // clear_all only wipes its own namespace.
    alpha.clear_all().unwrap();
    assert!(alpha.get("accounts").unwrap().is_none());
    assert!(beta.get("accounts").unwrap().is_some());
}
