use std::{sync::Arc, time::Duration};

use chrono::NaiveDate;
use pursebook_domain::{ReminderConfig, ReminderTime};

use super::{evaluate, next_reminder, NextReminder, ReminderDecision, ReminderSettings};
use crate::{Clock, CoreError, NotificationSink, PermissionState, ReminderMessage};

pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Active,
}

/// Result of one scheduler check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The scheduler is idle; nothing was evaluated.
    Inactive,
    Skipped(ReminderDecision),
    Fired {
        time: ReminderTime,
        date: NaiveDate,
        persisted: bool,
    },
    /// A reminder was due but the sink may not show it.
    Blocked(PermissionState),
    /// A reminder was due but the sink failed to emit it. Retried on the next check.
    DeliveryFailed,
}

impl TickOutcome {
    pub fn fired(&self) -> bool {
        matches!(self, TickOutcome::Fired { .. })
    }
}

/// Drives the reminder policy against a clock and a notification sink.
///
/// The scheduler owns no timer; callers invoke [`ReminderScheduler::tick`] once
/// per interval while it is active.
pub struct ReminderScheduler<N, C> {
    sink: N,
    clock: C,
    settings: Arc<ReminderSettings>,
    state: SchedulerState,
    interval: Duration,
}

impl<N, C> ReminderScheduler<N, C>
where
    N: NotificationSink,
    C: Clock,
{
    pub fn new(settings: Arc<ReminderSettings>, sink: N, clock: C) -> Self {
        Self {
            sink,
            clock,
            settings,
            state: SchedulerState::Idle,
            interval: DEFAULT_CHECK_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SchedulerState::Active
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn settings(&self) -> &Arc<ReminderSettings> {
        &self.settings
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut N {
        &mut self.sink
    }

    pub fn config(&self) -> ReminderConfig {
        self.settings.snapshot()
    }

    pub fn next_reminder(&self) -> Option<NextReminder> {
        next_reminder(&self.settings.snapshot(), self.clock.now())
    }

    /// Reconciles the lifecycle with the latest configuration. Becoming or
    /// staying active performs one immediate check.
    pub fn sync(&mut self) -> TickOutcome {
        let enabled = self.settings.snapshot().enabled;
        match (self.state, enabled) {
            (SchedulerState::Idle, true) => {
                tracing::info!(interval_secs = self.interval.as_secs(), "reminder scheduler started");
                self.state = SchedulerState::Active;
                self.check()
            }
            (SchedulerState::Active, true) => self.check(),
            (_, false) => {
                self.stop();
                TickOutcome::Inactive
            }
        }
    }

    /// Periodic check. No-op while idle; goes idle if reminders were disabled.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state == SchedulerState::Idle {
            return TickOutcome::Inactive;
        }
        if !self.settings.snapshot().enabled {
            self.stop();
            return TickOutcome::Inactive;
        }
        self.check()
    }

    /// Replaces the whole configuration, then reconciles.
    pub fn reconfigure(&mut self, config: ReminderConfig) -> Result<TickOutcome, CoreError> {
        self.settings.replace(config)?;
        Ok(self.sync())
    }

    pub fn stop(&mut self) {
        if self.state == SchedulerState::Active {
            tracing::info!("reminder scheduler stopped");
        }
        self.state = SchedulerState::Idle;
    }

    fn check(&mut self) -> TickOutcome {
        let config = self.settings.snapshot();
        let now = self.clock.now();
        let time = match evaluate(&config, now) {
            ReminderDecision::Due(time) => time,
            decision => {
                tracing::debug!(?decision, %now, "no reminder due");
                return TickOutcome::Skipped(decision);
            }
        };

        match self.sink.permission_state() {
            PermissionState::Granted => self.fire(&config, time, now.date()),
            PermissionState::Denied => {
                tracing::warn!("notification permission denied; disabling reminders");
                self.settings.disable();
                self.stop();
                TickOutcome::Blocked(PermissionState::Denied)
            }
            state => {
                tracing::warn!(permission = %state, "reminder due but notifications are not allowed");
                TickOutcome::Blocked(state)
            }
        }
    }

    fn fire(&mut self, config: &ReminderConfig, time: ReminderTime, date: NaiveDate) -> TickOutcome {
        let message = ReminderMessage::periodic(config);
        if let Err(err) = self.sink.notify(&message) {
            tracing::warn!(error = %err, "failed to deliver reminder; will retry");
            return TickOutcome::DeliveryFailed;
        }
        let outcome = self.settings.mark_fired(date);
        tracing::info!(%time, %date, "reminder fired");
        TickOutcome::Fired {
            time,
            date,
            persisted: outcome.is_persisted(),
        }
    }
}
