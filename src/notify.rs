//! Terminal notification sink.
//!
//! Permission is the `notifications_allowed` answer stored in the config file.
//! It is asked once, through a yes/no prompt, and remembered. The file is
//! re-read on every query so edits made while a watch runs take effect.

use std::io::{self, BufRead, Write};

use colored::Colorize;
use pursebook_config::ConfigManager;
use pursebook_core::{CoreError, NotificationSink, PermissionState, ReminderMessage};

pub struct TerminalNotifier<R, W> {
    manager: ConfigManager,
    /// Answer known to this process; used while the file holds none.
    allowed: Option<bool>,
    input: R,
    output: W,
}

impl TerminalNotifier<io::StdinLock<'static>, io::Stdout> {
    /// Notifier reading answers from stdin and printing to stdout.
    pub fn stdio(manager: ConfigManager, allowed: Option<bool>) -> Self {
        Self::new(manager, allowed, io::stdin().lock(), io::stdout())
    }
}

impl<R, W> TerminalNotifier<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(manager: ConfigManager, allowed: Option<bool>, input: R, output: W) -> Self {
        Self {
            manager,
            allowed,
            input,
            output,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    fn current_answer(&self) -> Option<bool> {
        match self.manager.load() {
            Ok(config) => config.notifications_allowed.or(self.allowed),
            Err(err) => {
                tracing::warn!(error = %err, "could not re-read notification permission");
                self.allowed
            }
        }
    }

    fn remember(&mut self, allowed: bool) {
        self.allowed = Some(allowed);
        if let Err(err) = self
            .manager
            .update(|config| config.notifications_allowed = Some(allowed))
        {
            tracing::warn!(error = %err, "could not store notification permission");
        }
    }
}

impl<R, W> NotificationSink for TerminalNotifier<R, W>
where
    R: BufRead,
    W: Write,
{
    fn permission_state(&self) -> PermissionState {
        match self.current_answer() {
            Some(true) => PermissionState::Granted,
            Some(false) => PermissionState::Denied,
            None => PermissionState::Unprompted,
        }
    }

    fn request_permission(&mut self) -> PermissionState {
        if self.current_answer().is_some() {
            return self.permission_state();
        }
        let prompt = "Allow pursebook to show reminder notifications? [y/N] ";
        if write!(self.output, "{}", prompt.bright_cyan())
            .and_then(|()| self.output.flush())
            .is_err()
        {
            return PermissionState::Unavailable;
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => {
                let _ = writeln!(self.output);
                tracing::warn!("no answer to the notification prompt");
                PermissionState::Unavailable
            }
            Ok(_) => {
                let granted = matches!(
                    answer.trim().to_ascii_lowercase().as_str(),
                    "y" | "yes" | "s" | "sim"
                );
                self.remember(granted);
                self.permission_state()
            }
        }
    }

    fn notify(&mut self, message: &ReminderMessage) -> Result<(), CoreError> {
        let banner = format!("[{}]", message.title).bold().bright_yellow();
        writeln!(self.output, "{banner} {}", message.body)
            .and_then(|()| self.output.flush())
            .map_err(|err| CoreError::Notification(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pursebook_domain::ReminderConfig;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn notifier(
        allowed: Option<bool>,
        input: &str,
        dir: &std::path::Path,
    ) -> TerminalNotifier<Cursor<Vec<u8>>, Vec<u8>> {
        let manager = ConfigManager::with_base_dir(dir).unwrap();
        TerminalNotifier::new(
            manager,
            allowed,
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
        )
    }

    #[test]
    fn yes_answer_grants_and_is_remembered() {
        let dir = tempdir().unwrap();
        let mut sink = notifier(None, "y\n", dir.path());
        assert_eq!(sink.permission_state(), PermissionState::Unprompted);
        assert_eq!(sink.request_permission(), PermissionState::Granted);
        let stored = ConfigManager::with_base_dir(dir.path())
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(stored.notifications_allowed, Some(true));
    }

    #[test]
    fn anything_else_denies() {
        let dir = tempdir().unwrap();
        let mut sink = notifier(None, "maybe\n", dir.path());
        assert_eq!(sink.request_permission(), PermissionState::Denied);
    }

    #[test]
    fn closed_input_leaves_permission_unanswered() {
        let dir = tempdir().unwrap();
        let mut sink = notifier(None, "", dir.path());
        assert_eq!(sink.request_permission(), PermissionState::Unavailable);
        assert_eq!(sink.permission_state(), PermissionState::Unprompted);
    }

    #[test]
    fn permission_follows_edits_to_the_config_file() {
        let dir = tempdir().unwrap();
        let mut sink = notifier(Some(true), "y\n", dir.path());
        assert_eq!(sink.permission_state(), PermissionState::Granted);

        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        manager
            .update(|config| config.notifications_allowed = Some(false))
            .unwrap();
        assert_eq!(sink.permission_state(), PermissionState::Denied);
        assert_eq!(sink.request_permission(), PermissionState::Denied);
        assert!(sink.output().is_empty());

        manager
            .update(|config| config.notifications_allowed = Some(true))
            .unwrap();
        assert_eq!(sink.permission_state(), PermissionState::Granted);
    }

    #[test]
    fn notify_prints_title_and_body() {
        let dir = tempdir().unwrap();
        let mut sink = notifier(Some(true), "", dir.path());
        sink.notify(&ReminderMessage::periodic(&ReminderConfig::default()))
            .unwrap();
        let printed = String::from_utf8(sink.output().clone()).unwrap();
        assert!(printed.contains("Finance reminder"));
        assert!(printed.contains("every 1 day"));
    }
}
