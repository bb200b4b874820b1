use std::{fs, sync::Arc};

use chrono::NaiveDate;
use pursebook_core::{KeyValueStore, Persistence, Tracker, TRANSACTIONS_KEY};
use pursebook_domain::{NewTransaction, TransactionKind};
use pursebook_storage_json::JsonFileStore;
use tempfile::tempdir;

#[test]
fn json_store_can_save_and_load_values() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("data")).expect("create store");

    assert_eq!(store.get("transactions").expect("get"), None);
    store.set("transactions", "[]").expect("set");

    assert_eq!(store.get("transactions").expect("get").as_deref(), Some("[]"));
    let path = store.entry_path("transactions");
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn overwrites_keep_bounded_snapshots() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::with_retention(dir.path().to_path_buf(), 3).expect("create store");

    for value in 0..6 {
        store
            .set("reminder_config", &format!("{{\"v\":{value}}}"))
            .expect("set");
    }

    let snapshots = store.list_snapshots("reminder_config").expect("list");
    assert_eq!(snapshots.len(), 3);
    assert!(snapshots.iter().all(|info| info.created_at.is_some()));
    let newest = fs::read_to_string(&snapshots[0].path).expect("read snapshot");
    assert_eq!(newest, "{\"v\":4}");
}

#[test]
fn identical_writes_do_not_snapshot() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("create store");

    store.set("transactions", "[]").expect("set");
    store.set("transactions", "[]").expect("set again");

    assert!(store.list_snapshots("transactions").expect("list").is_empty());
}

#[test]
fn restore_brings_back_a_previous_value() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("create store");
    store.set("transactions", "[1]").expect("first");
    store.set("transactions", "[2]").expect("second");

    let snapshot = store.list_snapshots("transactions").expect("list")[0].clone();
    let restored = store
        .restore_snapshot("transactions", &snapshot.id)
        .expect("restore");

    assert_eq!(restored, "[1]");
    assert_eq!(store.get("transactions").expect("get").as_deref(), Some("[1]"));
    assert!(store.restore_snapshot("transactions", "missing.json").is_err());
}

#[test]
fn tracker_survives_a_restart_on_disk() {
    let dir = tempdir().expect("tempdir");
    let open = || {
        let store = JsonFileStore::new(dir.path().to_path_buf()).expect("create store");
        Tracker::open(Arc::new(Persistence::new(Box::new(store))))
    };

    let mut tracker = open();
    tracker
        .add_transaction(NewTransaction::new(
            TransactionKind::Expense,
            89.90,
            "Contas",
            "Internet",
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
        ))
        .expect("add");
    drop(tracker);

    let reopened = open();
    assert_eq!(reopened.transactions().len(), 1);
    assert_eq!(reopened.transactions()[0].category, "Contas");
}

#[test]
fn corrupt_file_opens_as_empty_profile() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("create store");
    fs::write(store.entry_path(TRANSACTIONS_KEY), "{{{{").expect("write garbage");

    let tracker = Tracker::open(Arc::new(Persistence::new(Box::new(store))));
    assert!(tracker.transactions().is_empty());
}
