//! pursebook-storage-json
//!
//! Filesystem [`KeyValueStore`]: one pretty JSON file per key, written
//! atomically, with timestamped snapshots of every replaced value.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use pursebook_core::{CoreError, KeyValueStore};

const ENTRY_EXTENSION: &str = "json";
const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const SNAPSHOTS_DIR: &str = "snapshots";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// A previous value of a key, kept on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub key: String,
    /// File name; pass it back to [`JsonFileStore::restore_snapshot`].
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// Filesystem-backed JSON key-value store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
    snapshots_dir: PathBuf,
    retention: usize,
}

impl JsonFileStore {
    pub fn new(root: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(root, DEFAULT_RETENTION)
    }

    pub fn with_retention(root: PathBuf, retention: usize) -> Result<Self, CoreError> {
        let snapshots_dir = root.join(SNAPSHOTS_DIR);
        fs::create_dir_all(&root)?;
        fs::create_dir_all(&snapshots_dir)?;
        Ok(Self {
            root,
            snapshots_dir,
            retention: retention.max(1),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_name(key), ENTRY_EXTENSION))
    }

    /// Snapshots of `key`, newest first.
    pub fn list_snapshots(&self, key: &str) -> Result<Vec<SnapshotInfo>, CoreError> {
        let dir = self.snapshot_dir(key);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_name(key);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                let size_bytes = entry.metadata().map(|meta| meta.len()).unwrap_or(0);
                entries.push(SnapshotInfo {
                    key: slug.clone(),
                    id: file_name.to_string(),
                    created_at: parse_snapshot_timestamp(file_name),
                    size_bytes,
                    path: path.clone(),
                });
            }
        }
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(entries)
    }

    /// Makes snapshot `id` the current value of `key`, snapshotting the value it
    /// replaces. Returns the restored value.
    pub fn restore_snapshot(&self, key: &str, id: &str) -> Result<String, CoreError> {
        let snapshot = self
            .list_snapshots(key)?
            .into_iter()
            .find(|info| info.id == id)
            .ok_or_else(|| CoreError::Storage(format!("snapshot `{id}` not found for `{key}`")))?;
        let data = fs::read_to_string(&snapshot.path)?;
        self.set(key, &data)?;
        tracing::info!(key, snapshot = id, "snapshot restored");
        Ok(data)
    }

    fn snapshot_dir(&self, key: &str) -> PathBuf {
        self.snapshots_dir.join(canonical_name(key))
    }

    fn snapshot_existing(&self, key: &str, path: &Path) -> Result<(), CoreError> {
        let dir = self.snapshot_dir(key);
        fs::create_dir_all(&dir)?;
        let stem = format!(
            "{}_{}",
            canonical_name(key),
            Utc::now().format(SNAPSHOT_TIMESTAMP_FORMAT)
        );
        let file_name = match self.last_sequence(key, &stem)? {
            None => format!("{stem}.{ENTRY_EXTENSION}"),
            Some(last) => format!("{stem}_{:04}.{ENTRY_EXTENSION}", last + 1),
        };
        fs::copy(path, dir.join(file_name))?;
        self.prune_snapshots(key)
    }

    /// Highest sequence number among snapshots taken within the same second.
    /// The unsuffixed snapshot counts as 0.
    fn last_sequence(&self, key: &str, stem: &str) -> Result<Option<u32>, CoreError> {
        let mut last = None;
        for info in self.list_snapshots(key)? {
            let Some(rest) = info.id.strip_prefix(stem) else {
                continue;
            };
            let rest = rest.trim_end_matches(&format!(".{ENTRY_EXTENSION}"));
            let sequence = match rest.strip_prefix('_') {
                None if rest.is_empty() => 0,
                Some(digits) => match digits.parse::<u32>() {
                    Ok(value) => value,
                    Err(_) => continue,
                },
                None => continue,
            };
            last = last.max(Some(sequence));
        }
        Ok(last)
    }

    fn prune_snapshots(&self, key: &str) -> Result<(), CoreError> {
        let entries = self.list_snapshots(key)?;
        for entry in entries.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                tracing::debug!(snapshot = %entry.id, error = %err, "could not prune snapshot");
            }
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.entry_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if path.exists() {
            let previous = fs::read_to_string(&path)?;
            if previous == value {
                return Ok(());
            }
            self.snapshot_existing(key, &path)?;
        }
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(key, bytes = value.len(), "entry written");
        Ok(())
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "entry".into()
    } else {
        sanitized
    }
}

/// Reads the `YYYYMMDD_HHMMSS` part out of `<key>_<date>_<time>[_<seq>].json`.
fn parse_snapshot_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", ENTRY_EXTENSION))?;
    let segments = trimmed.split('_').collect::<Vec<_>>();
    let position = segments
        .windows(2)
        .rposition(|pair| is_digits(pair[0], 8) && is_digits(pair[1], 6))?;
    let raw = format!("{}{}", segments[position], segments[position + 1]);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_replaces_unsafe_characters() {
        assert_eq!(canonical_name("reminder_config"), "reminder_config");
        assert_eq!(canonical_name("../Etc"), "___etc");
        assert_eq!(canonical_name("  "), "entry");
    }

    #[test]
    fn snapshot_timestamp_ignores_sequence_suffix() {
        let parsed = parse_snapshot_timestamp("transactions_20240104_200000_0002.json").unwrap();
        assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-04 20:00:00");
        assert!(parse_snapshot_timestamp("reminder_config.json").is_none());
    }
}
