mod common;

use std::fs;

use common::{cli, profile, run_ok, transaction_ids};
use predicates::str::contains;

#[test]
fn replaced_values_are_snapshotted_and_restorable() {
    let home = profile(None);
    run_ok(&home, &["add", "expense", "10", "Lazer"]);
    let first = transaction_ids(&home);
    run_ok(&home, &["add", "expense", "20", "Compras"]);
    assert_eq!(transaction_ids(&home).len(), 2);

    let dir = home.join("data").join("snapshots").join("transactions");
    let snapshot = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .next()
        .expect("one snapshot");

    cli(&home)
        .args(["snapshots", "transactions"])
        .assert()
        .success()
        .stdout(contains(snapshot.as_str()));

    cli(&home)
        .args(["restore", "transactions", &snapshot])
        .assert()
        .success()
        .stdout(contains("restored"));
    assert_eq!(transaction_ids(&home), first);
}

#[test]
fn snapshots_of_untouched_key_are_empty() {
    let home = profile(None);
    cli(&home)
        .args(["snapshots", "reminder_config"])
        .assert()
        .success()
        .stdout(contains("No snapshots"));
}

#[test]
fn unknown_key_and_snapshot_are_input_errors() {
    let home = profile(None);
    cli(&home)
        .args(["snapshots", "accounts"])
        .assert()
        .failure()
        .stderr(contains("unknown key"));
    cli(&home)
        .args(["restore", "transactions", "transactions_20200101_000000.json"])
        .assert()
        .failure()
        .stderr(contains("no snapshot"));
}

#[test]
fn corrupt_snapshot_is_not_restored() {
    let home = profile(None);
    run_ok(&home, &["add", "expense", "10", "Lazer"]);
    let dir = home.join("data").join("snapshots").join("transactions");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("transactions_20200101_000000.json"), "{oops").unwrap();

    cli(&home)
        .args(["restore", "transactions", "transactions_20200101_000000.json"])
        .assert()
        .failure()
        .stderr(contains("not a valid transactions value"));
    assert_eq!(transaction_ids(&home).len(), 1);
}

#[test]
fn version_prints_build_metadata() {
    let home = profile(None);
    cli(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(contains(format!("pursebook {}", env!("CARGO_PKG_VERSION"))))
        .stdout(contains("Target"));
}
