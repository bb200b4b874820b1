use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use chrono::NaiveDate;
use pursebook_domain::ReminderConfig;

use crate::{CoreError, Persistence, SaveOutcome};

struct State {
    current: ReminderConfig,
    /// Last value known to be in the store: loaded from it or written to it.
    stored: Option<ReminderConfig>,
}

/// Shared holder of the current reminder configuration.
///
/// Readers always get a whole snapshot; every write replaces the whole value and
/// is written through to persistence.
pub struct ReminderSettings {
    state: RwLock<State>,
    persistence: Arc<Persistence>,
}

impl ReminderSettings {
    /// Loads the stored configuration, falling back to defaults.
    pub fn load(persistence: Arc<Persistence>) -> Self {
        let stored = match persistence.try_load_reminder_config() {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(error = %err, "stored reminder config is unreadable; using defaults");
                None
            }
        };
        Self {
            state: RwLock::new(State {
                current: stored.clone().unwrap_or_default(),
                stored,
            }),
            persistence,
        }
    }

    pub fn with_config(config: ReminderConfig, persistence: Arc<Persistence>) -> Self {
        Self {
            state: RwLock::new(State {
                current: config,
                stored: None,
            }),
            persistence,
        }
    }

    pub fn snapshot(&self) -> ReminderConfig {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    /// Replaces the configuration after validating it.
    pub fn replace(&self, config: ReminderConfig) -> Result<SaveOutcome, CoreError> {
        config.validate()?;
        if config.is_inert() {
            tracing::warn!("reminders are enabled without any time of day; nothing will fire");
        }
        let mut state = self.write();
        state.current = config;
        Ok(self.persist(&mut state))
    }

    /// Records a firing on `date`, keeping every other field of the latest value.
    pub fn mark_fired(&self, date: NaiveDate) -> SaveOutcome {
        let mut state = self.write();
        state.current = state.current.fired_on(date);
        self.persist(&mut state)
    }

    pub fn set_enabled(&self, enabled: bool) -> SaveOutcome {
        let mut state = self.write();
        if state.current.enabled == enabled {
            return SaveOutcome::Persisted;
        }
        state.current = ReminderConfig {
            enabled,
            ..state.current.clone()
        };
        self.persist(&mut state)
    }

    pub fn disable(&self) -> SaveOutcome {
        self.set_enabled(false)
    }

    /// Restores cadence and times to their defaults. Keeps the firing history.
    pub fn reset(&self) -> SaveOutcome {
        let mut state = self.write();
        state.current = ReminderConfig {
            last_fired_date: state.current.last_fired_date,
            ..ReminderConfig::default()
        };
        self.persist(&mut state)
    }

    /// Re-reads the stored configuration, picking up edits made by another
    /// process. Returns `true` when the in-memory value changed.
    ///
    /// A stored value equal to the last one this process loaded or wrote is not
    /// an edit, so changes that failed to save stay in effect. An adopted edit
    /// never moves `last_fired_date` back past a firing recorded here.
    /// Unreadable or invalid stored data leaves the current value untouched.
    pub fn refresh(&self) -> bool {
        let stored = match self.persistence.try_load_reminder_config() {
            Ok(Some(config)) => config,
            Ok(None) => return false,
            Err(err) => {
                tracing::debug!(error = %err, "ignoring unreadable reminder config on refresh");
                return false;
            }
        };
        let mut state = self.write();
        if state.stored.as_ref() == Some(&stored) {
            return false;
        }
        let adopted = ReminderConfig {
            last_fired_date: stored.last_fired_date.max(state.current.last_fired_date),
            ..stored.clone()
        };
        state.stored = Some(stored);
        if state.current == adopted {
            return false;
        }
        state.current = adopted;
        true
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, state: &mut State) -> SaveOutcome {
        let outcome = SaveOutcome::settle(
            self.persistence.save_reminder_config(&state.current),
            "reminder config",
        );
        if outcome.is_persisted() {
            state.stored = Some(state.current.clone());
        }
        outcome
    }
}
