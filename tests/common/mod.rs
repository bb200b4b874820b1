#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use assert_cmd::Command;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Holds TempDir guards so profile folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated application home with colors off and the given
/// notification permission answer.
pub fn profile(notifications_allowed: Option<bool>) -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let home = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let config = json!({
        "ui_color_enabled": false,
        "notifications_allowed": notifications_allowed,
    });
    fs::write(
        home.join("config.json"),
        serde_json::to_string_pretty(&config).expect("serialize config"),
    )
    .expect("write config");
    home
}

/// `pursebook_cli` pointed at `home`.
pub fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pursebook_cli").expect("binary is built");
    cmd.env("PURSEBOOK_HOME", home)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off");
    cmd
}

/// Runs a command that is expected to succeed and returns its stdout.
pub fn run_ok(home: &Path, args: &[&str]) -> String {
    let output = cli(home).args(args).assert().success();
    String::from_utf8_lossy(&output.get_output().stdout).into_owned()
}

pub fn data_file(home: &Path, key: &str) -> PathBuf {
    home.join("data").join(format!("{key}.json"))
}

pub fn read_key(home: &Path, key: &str) -> Value {
    let raw = fs::read_to_string(data_file(home, key)).expect("read data file");
    serde_json::from_str(&raw).expect("data file is JSON")
}

/// Ids of the stored transactions, newest first.
pub fn transaction_ids(home: &Path) -> Vec<String> {
    let listed: Value =
        serde_json::from_str(&run_ok(home, &["list", "--json"])).expect("list --json output");
    listed
        .as_array()
        .expect("array of transactions")
        .iter()
        .map(|txn| txn["id"].as_str().expect("id string").to_string())
        .collect()
}
