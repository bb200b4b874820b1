//! Key-value persistence adapter for transactions and the reminder configuration.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use pursebook_domain::{ReminderConfig, Transaction};

use crate::CoreError;

pub const TRANSACTIONS_KEY: &str = "transactions";
pub const REMINDER_CONFIG_KEY: &str = "reminder_config";

/// Durable string store addressed by key, scoped to one user profile.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

/// Volatile store used for tests and as a fallback when no data directory is usable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Whether a mutation reached durable storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveOutcome {
    #[default]
    Persisted,
    /// The write failed; the change only lives in memory for this session.
    MemoryOnly,
}

impl SaveOutcome {
    /// Logs a failed write and downgrades it to [`SaveOutcome::MemoryOnly`].
    pub fn settle(result: Result<(), CoreError>, what: &str) -> Self {
        match result {
            Ok(()) => SaveOutcome::Persisted,
            Err(err) => {
                tracing::warn!(error = %err, "failed to persist {what}; keeping it in memory");
                SaveOutcome::MemoryOnly
            }
        }
    }

    pub fn is_persisted(self) -> bool {
        matches!(self, SaveOutcome::Persisted)
    }
}

/// Typed access to the two persisted entities.
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Loads the transaction list. Missing or unreadable data yields an empty list;
    /// individual entries that break the transaction invariants are dropped.
    pub fn load_transactions(&self) -> Vec<Transaction> {
        let raw = match self.store.get(TRANSACTIONS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read transactions; starting empty");
                return Vec::new();
            }
        };
        let transactions: Vec<Transaction> = match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(error = %err, "stored transactions are malformed; starting empty");
                return Vec::new();
            }
        };
        transactions
            .into_iter()
            .filter(|txn| match txn.validate() {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(id = %txn.id, error = %err, "dropping invalid stored transaction");
                    false
                }
            })
            .collect()
    }

    pub fn save_transactions(&self, transactions: &[Transaction]) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(transactions)?;
        self.store.set(TRANSACTIONS_KEY, &json)
    }

    /// Loads the reminder configuration, falling back to defaults when it is
    /// missing, unreadable or invalid.
    pub fn load_reminder_config(&self) -> ReminderConfig {
        match self.try_load_reminder_config() {
            Ok(Some(config)) => config,
            Ok(None) => ReminderConfig::default(),
            Err(err) => {
                tracing::warn!(error = %err, "stored reminder config unusable; using defaults");
                ReminderConfig::default()
            }
        }
    }

    /// Strict variant of [`Persistence::load_reminder_config`]: reports read and
    /// parse failures instead of masking them.
    pub fn try_load_reminder_config(&self) -> Result<Option<ReminderConfig>, CoreError> {
        let Some(raw) = self.store.get(REMINDER_CONFIG_KEY)? else {
            return Ok(None);
        };
        let config: ReminderConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(Some(config))
    }

    pub fn save_reminder_config(&self, config: &ReminderConfig) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(config)?;
        self.store.set(REMINDER_CONFIG_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pursebook_domain::{NewTransaction, TransactionKind};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, CoreError> {
            Err(CoreError::Storage("disk unplugged".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), CoreError> {
            Err(CoreError::Storage("disk unplugged".into()))
        }
    }

    #[test]
    fn missing_keys_load_as_empty_and_default() {
        let persistence = Persistence::in_memory();
        assert!(persistence.load_transactions().is_empty());
        assert_eq!(persistence.load_reminder_config(), ReminderConfig::default());
    }

    #[test]
    fn corrupt_entries_are_treated_as_absent() {
        let store = MemoryStore::new()
            .with_entry(TRANSACTIONS_KEY, "[{not json")
            .with_entry(REMINDER_CONFIG_KEY, r#"{"enabled": "yes"}"#);
        let persistence = Persistence::new(Box::new(store));
        assert!(persistence.load_transactions().is_empty());
        assert_eq!(persistence.load_reminder_config(), ReminderConfig::default());
        assert!(persistence.try_load_reminder_config().is_err());
    }

    #[test]
    fn zero_cadence_on_disk_falls_back_to_defaults() {
        let store = MemoryStore::new().with_entry(
            REMINDER_CONFIG_KEY,
            r#"{"enabled":true,"cadence_days":0,"times":["20:00"]}"#,
        );
        let persistence = Persistence::new(Box::new(store));
        assert_eq!(persistence.load_reminder_config(), ReminderConfig::default());
    }

    #[test]
    fn invalid_stored_transactions_are_dropped_individually() {
        let persistence = Persistence::in_memory();
        let good = Transaction::from_new(NewTransaction::new(
            TransactionKind::Expense,
            12.0,
            "Lazer",
            "",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ));
        let mut bad = good.clone();
        bad.id = uuid::Uuid::new_v4();
        bad.amount = -4.0;
        persistence
            .save_transactions(&[bad, good.clone()])
            .unwrap();
        assert_eq!(persistence.load_transactions(), vec![good]);
    }

    #[test]
    fn unreadable_store_never_panics() {
        let persistence = Persistence::new(Box::new(BrokenStore));
        assert!(persistence.load_transactions().is_empty());
        assert_eq!(persistence.load_reminder_config(), ReminderConfig::default());
        let outcome = SaveOutcome::settle(persistence.save_transactions(&[]), "transactions");
        assert_eq!(outcome, SaveOutcome::MemoryOnly);
    }
}
