use std::time::Duration;

use pursebook_core::{
    next_reminder, Clock, CoreError, NotificationSink, PermissionState, SystemClock,
};
use pursebook_domain::{ReminderConfig, ReminderTime, CADENCE_PRESETS};

use super::{App, ReminderCommand, SetArgs};
use crate::{errors::CliError, output, runner};

pub fn run(app: &App, command: ReminderCommand) -> Result<(), CliError> {
    match command {
        ReminderCommand::Show => show(app),
        ReminderCommand::Set(args) => set(app, args),
        ReminderCommand::AddTime { time } => {
            let time = time_arg(&time)?;
            edit_times(app, |config| {
                if !config.add_time(time) {
                    output::info(format!("{time} is already configured."));
                }
            })
        }
        ReminderCommand::RemoveTime { time } => {
            let time = time_arg(&time)?;
            edit_times(app, |config| {
                if !config.remove_time(time) {
                    output::warning(format!("{time} is not configured."));
                }
            })
        }
        ReminderCommand::Enable => enable(app),
        ReminderCommand::Disable => {
            output::saved(app.tracker.disable_reminders());
            output::success("Reminders disabled.");
            Ok(())
        }
        ReminderCommand::Test => test(app),
        ReminderCommand::Check => check(app),
        ReminderCommand::Watch { interval_secs } => watch(app, interval_secs),
    }
}

fn show(app: &App) -> Result<(), CliError> {
    let config = app.tracker.reminder_config();
    let notifier = app.notifier();
    output::section("Reminders");
    output::info(format!(
        "Status:      {}",
        if config.enabled { "on" } else { "off" }
    ));
    output::info(format!("Cadence:     {}", config.cadence_label()));
    let presets: Vec<String> = CADENCE_PRESETS.iter().map(u32::to_string).collect();
    output::info(format!("Presets:     {} days", presets.join(", ")));
    let times = if config.times.is_empty() {
        "none".to_string()
    } else {
        config.times_label()
    };
    output::info(format!("Times:       {times}"));
    let last = config
        .last_fired_date
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "never".into());
    output::info(format!("Last sent:   {last}"));
    output::info(format!("Permission:  {}", notifier.permission_state()));
    print_next(&config);
    if config.is_inert() {
        output::warning("Reminders are on but no time of day is set; nothing will be sent.");
    }
    Ok(())
}

fn set(app: &App, args: SetArgs) -> Result<(), CliError> {
    if args.reset {
        output::saved(app.tracker.reminders().reset());
        output::success("Reminder cadence and times restored to defaults.");
        return Ok(());
    }
    if args.cadence.is_none() && args.times.is_none() {
        return Err(CliError::input("pass --cadence, --times or --reset"));
    }
    let mut config = app.tracker.reminder_config();
    if let Some(days) = args.cadence {
        config = config.with_cadence(days);
    }
    if let Some(times) = args.times {
        config.times.clear();
        for raw in times.iter().filter(|raw| !raw.trim().is_empty()) {
            config.add_time(time_arg(raw)?);
        }
    }
    save(app, config)
}

fn edit_times<F>(app: &App, change: F) -> Result<(), CliError>
where
    F: FnOnce(&mut ReminderConfig),
{
    let mut config = app.tracker.reminder_config();
    change(&mut config);
    save(app, config)
}

fn save(app: &App, config: ReminderConfig) -> Result<(), CliError> {
    let saved = app.tracker.save_reminders(config.clone())?;
    output::success(format!(
        "Reminders {}: {} at {}.",
        if config.enabled { "on" } else { "off" },
        config.cadence_label(),
        if config.times.is_empty() {
            "no times".to_string()
        } else {
            config.times_label()
        }
    ));
    output::saved(saved);
    print_next(&config);
    Ok(())
}

fn enable(app: &App) -> Result<(), CliError> {
    let mut notifier = app.notifier();
    match app.tracker.enable_reminders(&mut notifier) {
        Ok(saved) => {
            output::success("Reminders enabled.");
            output::saved(saved);
            print_next(&app.tracker.reminder_config());
            Ok(())
        }
        Err(CoreError::PermissionDenied(state)) => {
            permission_hint(app, state);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn test(app: &App) -> Result<(), CliError> {
    let mut notifier = app.notifier();
    match app.tracker.send_test_notification(&mut notifier) {
        Ok(()) => Ok(()),
        Err(CoreError::PermissionDenied(state)) => {
            permission_hint(app, state);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn check(app: &App) -> Result<(), CliError> {
    let mut scheduler = app.tracker.scheduler(app.notifier(), SystemClock);
    let outcome = scheduler.sync();
    output::info(output::describe_outcome(&outcome));
    scheduler.stop();
    Ok(())
}

fn watch(app: &App, interval_secs: Option<u64>) -> Result<(), CliError> {
    let interval = interval_secs
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| app.config.check_interval());
    if !app.tracker.reminder_config().enabled {
        output::warning("Reminders are off; run `pursebook_cli reminder enable` first.");
        return Ok(());
    }
    let notifier = app.notifier();
    if notifier.permission_state() != PermissionState::Granted {
        permission_hint(app, notifier.permission_state());
    }
    let mut scheduler = app
        .tracker
        .scheduler(notifier, SystemClock)
        .with_interval(interval);
    output::info(format!(
        "Watching for reminders every {}s. Press Ctrl-C to stop.",
        interval.as_secs()
    ));
    let summary = runner::watch_until_interrupted(&mut scheduler)?;
    output::info(format!(
        "Stopped after {} check(s); {} reminder(s) sent.",
        summary.checks, summary.fired
    ));
    Ok(())
}

fn print_next(config: &ReminderConfig) {
    let now = SystemClock.now();
    if let Some(next) = next_reminder(config, now) {
        output::info(format!("Next reminder: {}.", next.describe(now.date())));
    }
}

fn permission_hint(app: &App, state: PermissionState) {
    match state {
        PermissionState::Denied => output::warning(format!(
            "Notifications are denied. Set \"notifications_allowed\" to true in {} to allow them.",
            app.config_manager.config_path().display()
        )),
        PermissionState::Unprompted => output::warning(
            "Notifications have not been allowed yet; run `pursebook_cli reminder enable`.",
        ),
        other => output::warning(format!("Notifications are {other}; reminders stay off.")),
    }
}

fn time_arg(raw: &str) -> Result<ReminderTime, CliError> {
    raw.parse::<ReminderTime>()
        .map_err(|err| CliError::Core(CoreError::from(err)))
}
