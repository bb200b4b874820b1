//! Permission-gated notification capability.

use std::fmt;

use pursebook_domain::ReminderConfig;

use crate::CoreError;

/// Whether the host may show notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionState {
    /// The host has no notification facility at all.
    Unavailable,
    /// The user has not been asked yet.
    Unprompted,
    Granted,
    Denied,
}

impl PermissionState {
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PermissionState::Unavailable => "unavailable",
            PermissionState::Unprompted => "not requested",
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
        };
        f.write_str(label)
    }
}

/// A notification ready to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderMessage {
    pub title: String,
    pub body: String,
}

impl ReminderMessage {
    /// The periodic "log your expenses" reminder.
    pub fn periodic(config: &ReminderConfig) -> Self {
        Self {
            title: "Finance reminder".into(),
            body: format!(
                "Don't forget to record your expenses! You asked to be reminded every {}.",
                day_count(config.cadence_days)
            ),
        }
    }

    /// Confirmation shown right after reminders are switched on.
    pub fn enabled() -> Self {
        Self {
            title: "Reminders enabled".into(),
            body: "You will get reminders to keep your finances up to date.".into(),
        }
    }

    pub fn test(config: &ReminderConfig) -> Self {
        let times = if config.times.is_empty() {
            "no times configured".to_string()
        } else {
            config.times_label()
        };
        Self {
            title: "Test notification".into(),
            body: format!(
                "You will be reminded every {} at: {}",
                day_count(config.cadence_days),
                times
            ),
        }
    }
}

fn day_count(days: u32) -> String {
    if days == 1 {
        "1 day".into()
    } else {
        format!("{days} days")
    }
}

/// Host notification facility.
///
/// `request_permission` may block on user input and must only be called from an
/// explicit user action, never from a scheduler check.
pub trait NotificationSink {
    fn permission_state(&self) -> PermissionState;

    /// Prompts the user. Returns `Granted`, `Denied` or `Unavailable`.
    fn request_permission(&mut self) -> PermissionState;

    /// Emits the notification. `Ok` means it was handed to the host.
    fn notify(&mut self, message: &ReminderMessage) -> Result<(), CoreError>;
}

/// In-memory sink that records every emitted message. Used by tests and dry runs.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    pub state: PermissionState,
    /// Permission the next `request_permission` call resolves to.
    pub answer: PermissionState,
    /// When set, `notify` fails with this reason.
    pub failure: Option<String>,
    pub delivered: Vec<ReminderMessage>,
}

impl RecordingSink {
    pub fn new(state: PermissionState) -> Self {
        Self {
            state,
            answer: state,
            failure: None,
            delivered: Vec::new(),
        }
    }

    pub fn granted() -> Self {
        Self::new(PermissionState::Granted)
    }

    pub fn answering(mut self, answer: PermissionState) -> Self {
        self.answer = answer;
        self
    }

    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }
}

impl NotificationSink for RecordingSink {
    fn permission_state(&self) -> PermissionState {
        self.state
    }

    fn request_permission(&mut self) -> PermissionState {
        if self.state == PermissionState::Unprompted {
            self.state = self.answer;
        }
        self.state
    }

    fn notify(&mut self, message: &ReminderMessage) -> Result<(), CoreError> {
        if let Some(reason) = &self.failure {
            return Err(CoreError::Notification(reason.clone()));
        }
        self.delivered.push(message.clone());
        Ok(())
    }
}
