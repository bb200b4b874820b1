//! Application facade: the transaction store plus reminder settings, both
//! written through to persistence on every mutation.

use std::sync::Arc;

use pursebook_domain::{NewTransaction, ReminderConfig, Transaction, TransactionPatch};
use uuid::Uuid;

use crate::{
    CategoryShare, Clock, CoreError, ImportReport, NotificationSink, PermissionState,
    Persistence, RejectedRecord, ReminderMessage, ReminderScheduler, ReminderSettings,
    SaveOutcome, StatementSource, Totals, TransactionStore,
};

/// Result of an edit or removal addressed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Applied(SaveOutcome),
    /// No entry carries the id; nothing changed.
    NotFound,
}

pub struct Tracker {
    store: TransactionStore,
    persistence: Arc<Persistence>,
    reminders: Arc<ReminderSettings>,
}

impl Tracker {
    /// Loads transactions and reminder settings, tolerating missing or corrupt data.
    pub fn open(persistence: Arc<Persistence>) -> Self {
        let store = TransactionStore::from_transactions(persistence.load_transactions());
        let reminders = Arc::new(ReminderSettings::load(persistence.clone()));
        tracing::debug!(transactions = store.len(), "tracker opened");
        Self {
            store,
            persistence,
            reminders,
        }
    }

    pub fn in_memory() -> Self {
        Self::open(Arc::new(Persistence::in_memory()))
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.store.list()
    }

    pub fn persistence(&self) -> &Arc<Persistence> {
        &self.persistence
    }

    pub fn reminders(&self) -> &Arc<ReminderSettings> {
        &self.reminders
    }

    pub fn reminder_config(&self) -> ReminderConfig {
        self.reminders.snapshot()
    }

    pub fn totals(&self) -> Totals {
        self.store.totals()
    }

    pub fn category_breakdown(&self) -> Vec<CategoryShare> {
        self.store.category_breakdown()
    }

    pub fn add_transaction(
        &mut self,
        draft: NewTransaction,
    ) -> Result<(Uuid, SaveOutcome), CoreError> {
        let id = self.store.add(draft)?;
        tracing::info!(%id, "transaction added");
        Ok((id, self.save_transactions()))
    }

    pub fn edit_transaction(
        &mut self,
        id: Uuid,
        patch: &TransactionPatch,
    ) -> Result<Change, CoreError> {
        if !self.store.edit(id, patch)? {
            tracing::debug!(%id, "edit ignored; no such transaction");
            return Ok(Change::NotFound);
        }
        tracing::info!(%id, "transaction updated");
        Ok(Change::Applied(self.save_transactions()))
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Change {
        match self.store.remove(id) {
            Some(_) => {
                tracing::info!(%id, "transaction removed");
                Change::Applied(self.save_transactions())
            }
            None => {
                tracing::debug!(%id, "remove ignored; no such transaction");
                Change::NotFound
            }
        }
    }

    /// Validates every record of `source` individually and prepends the valid ones
    /// in a single batch.
    pub fn import<S>(&mut self, source: &mut S) -> Result<(ImportReport, SaveOutcome), CoreError>
    where
        S: StatementSource + ?Sized,
    {
        let lines = source.lines()?;
        let mut accepted = Vec::with_capacity(lines.len());
        let mut report = ImportReport::default();
        for (index, line) in lines.into_iter().enumerate() {
            let position = index + 1;
            let outcome = line.and_then(|draft| {
                let draft = draft.normalized();
                draft.validate().map(|()| draft).map_err(|err| err.to_string())
            });
            match outcome {
                Ok(draft) => accepted.push(draft),
                Err(reason) => {
                    tracing::warn!(position, %reason, "rejecting statement record");
                    report.rejected.push(RejectedRecord { position, reason });
                }
            }
        }
        if accepted.is_empty() {
            return Ok((report, SaveOutcome::Persisted));
        }
        report.imported = self.store.bulk_add(accepted)?;
        tracing::info!(
            source = %source.name(),
            imported = report.imported.len(),
            rejected = report.rejected.len(),
            "statement imported"
        );
        Ok((report, self.save_transactions()))
    }

    /// Asks for permission when needed and switches reminders on. Sends the
    /// "reminders enabled" confirmation on success.
    pub fn enable_reminders<N>(&self, sink: &mut N) -> Result<SaveOutcome, CoreError>
    where
        N: NotificationSink + ?Sized,
    {
        let mut permission = sink.permission_state();
        if permission == PermissionState::Unprompted {
            permission = sink.request_permission();
        }
        if !permission.is_granted() {
            tracing::warn!(%permission, "cannot enable reminders");
            self.reminders.set_enabled(false);
            return Err(CoreError::PermissionDenied(permission));
        }
        let outcome = self.reminders.set_enabled(true);
        tracing::info!("reminders enabled");
        if let Err(err) = sink.notify(&ReminderMessage::enabled()) {
            tracing::warn!(error = %err, "failed to send enable confirmation");
        }
        Ok(outcome)
    }

    pub fn disable_reminders(&self) -> SaveOutcome {
        tracing::info!("reminders disabled");
        self.reminders.disable()
    }

    pub fn save_reminders(&self, config: ReminderConfig) -> Result<SaveOutcome, CoreError> {
        self.reminders.replace(config)
    }

    pub fn send_test_notification<N>(&self, sink: &mut N) -> Result<(), CoreError>
    where
        N: NotificationSink + ?Sized,
    {
        let permission = sink.permission_state();
        if !permission.is_granted() {
            return Err(CoreError::PermissionDenied(permission));
        }
        sink.notify(&ReminderMessage::test(&self.reminders.snapshot()))
    }

    /// Builds a scheduler sharing this tracker's reminder settings.
    pub fn scheduler<N, C>(&self, sink: N, clock: C) -> ReminderScheduler<N, C>
    where
        N: NotificationSink,
        C: Clock,
    {
        ReminderScheduler::new(self.reminders.clone(), sink, clock)
    }

    fn save_transactions(&self) -> SaveOutcome {
        SaveOutcome::settle(
            self.persistence.save_transactions(self.store.list()),
            "transactions",
        )
    }
}
