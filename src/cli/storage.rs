use std::fs;

use pursebook_core::{CoreError, REMINDER_CONFIG_KEY, TRANSACTIONS_KEY};
use pursebook_domain::{ReminderConfig, Transaction};

use super::App;
use crate::{errors::CliError, output, utils::build_info};

const KEYS: [&str; 2] = [TRANSACTIONS_KEY, REMINDER_CONFIG_KEY];

pub fn snapshots(app: &App, key: &str) -> Result<(), CliError> {
    let key = known_key(key)?;
    let store = app.file_store()?;
    let entries = store.list_snapshots(key)?;
    if entries.is_empty() {
        output::info(format!("No snapshots of {key} yet."));
        return Ok(());
    }
    output::section(format!("Snapshots of {key}"));
    for entry in entries {
        let created = entry
            .created_at
            .map(|ts| ts.format("%d/%m/%Y %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "-".into());
        output::info(format!(
            "{:<40} {:<24} {:>9}",
            entry.id,
            created,
            format_size(entry.size_bytes)
        ));
    }
    Ok(())
}

/// Restores a snapshot after checking it still holds a readable value.
pub fn restore(app: &App, key: &str, id: &str) -> Result<(), CliError> {
    let key = known_key(key)?;
    let store = app.file_store()?;
    let snapshot = store
        .list_snapshots(key)?
        .into_iter()
        .find(|entry| entry.id == id)
        .ok_or_else(|| CliError::input(format!("no snapshot '{id}' for {key}")))?;
    let raw = fs::read_to_string(&snapshot.path)?;
    check_snapshot(key, &raw)?;

    store.restore_snapshot(key, id)?;
    output::success(format!("{key} restored from {id}."));
    Ok(())
}

pub fn version() -> Result<(), CliError> {
    let meta = build_info::current();
    output::section(meta.short());
    let rows = [
        ("Build hash", format!("{} ({})", meta.git_hash, meta.git_status)),
        ("Built at", meta.timestamp.to_string()),
        ("Target", meta.target.to_string()),
        ("Profile", meta.profile.to_string()),
        ("Rustc", meta.rustc.to_string()),
    ];
    for (label, value) in rows {
        output::info(format!("{label:<12} {value}"));
    }
    Ok(())
}

fn known_key(raw: &str) -> Result<&'static str, CliError> {
    KEYS.iter()
        .copied()
        .find(|key| key.eq_ignore_ascii_case(raw.trim()))
        .ok_or_else(|| {
            CliError::input(format!(
                "unknown key '{raw}'; use {} or {}",
                TRANSACTIONS_KEY, REMINDER_CONFIG_KEY
            ))
        })
}

fn check_snapshot(key: &str, raw: &str) -> Result<(), CliError> {
    let unreadable = |err: serde_json::Error| {
        CliError::input(format!("snapshot is not a valid {key} value: {err}"))
    };
    if key == TRANSACTIONS_KEY {
        serde_json::from_str::<Vec<Transaction>>(raw).map_err(unreadable)?;
    } else {
        let config = serde_json::from_str::<ReminderConfig>(raw).map_err(unreadable)?;
        config.validate().map_err(CoreError::from)?;
    }
    Ok(())
}

fn format_size(size_bytes: u64) -> String {
    let kb = (size_bytes as f64) / 1024.0;
    if kb < 1.0 {
        format!("{size_bytes} B")
    } else {
        format!("{kb:.1} KB")
    }
}
