//! Pure reminder decisions over a configuration and the local wall clock.

use chrono::{Days, NaiveDate, NaiveDateTime};
use pursebook_domain::{ReminderConfig, ReminderTime};

/// Outcome of evaluating the policy at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderDecision {
    Disabled,
    /// Enabled, but no time of day is configured.
    NoTimes,
    /// The cadence has not elapsed since the last firing.
    NotEligible { eligible_on: NaiveDate },
    /// Eligible today, but the current minute matches no configured time.
    WaitingForTime,
    Due(ReminderTime),
}

impl ReminderDecision {
    pub fn is_due(&self) -> bool {
        matches!(self, ReminderDecision::Due(_))
    }
}

/// Day-level eligibility: enabled, and either never fired or at least
/// `cadence_days` calendar days have passed since the last firing.
pub fn should_fire(config: &ReminderConfig, today: NaiveDate) -> bool {
    if !config.enabled {
        return false;
    }
    match config.last_fired_date {
        None => true,
        Some(last) => (today - last).num_days() >= i64::from(config.cadence_days),
    }
}

/// First calendar day on which the cadence allows another firing.
pub fn eligible_from(config: &ReminderConfig, today: NaiveDate) -> NaiveDate {
    match config.last_fired_date {
        None => today,
        Some(last) => last
            .checked_add_days(Days::new(u64::from(config.cadence_days)))
            .unwrap_or(NaiveDate::MAX),
    }
}

/// The earliest configured time equal to `now` truncated to the minute.
pub fn matching_time(config: &ReminderConfig, now: NaiveDateTime) -> Option<ReminderTime> {
    config.times.iter().copied().find(|time| time.matches(now))
}

pub fn evaluate(config: &ReminderConfig, now: NaiveDateTime) -> ReminderDecision {
    if !config.enabled {
        return ReminderDecision::Disabled;
    }
    if config.times.is_empty() {
        return ReminderDecision::NoTimes;
    }
    let today = now.date();
    if !should_fire(config, today) {
        return ReminderDecision::NotEligible {
            eligible_on: eligible_from(config, today),
        };
    }
    match matching_time(config, now) {
        Some(time) => ReminderDecision::Due(time),
        None => ReminderDecision::WaitingForTime,
    }
}

/// When the next reminder is expected to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextReminder {
    pub at: NaiveDateTime,
}

impl NextReminder {
    pub fn time(&self) -> ReminderTime {
        ReminderTime::of(self.at)
    }

    /// Human label relative to `today`: "today at 20:00", "tomorrow at 20:00" or
    /// "in 3 days at 20:00".
    pub fn describe(&self, today: NaiveDate) -> String {
        let days = (self.at.date() - today).num_days();
        let time = self.time();
        match days {
            0 => format!("today at {time}"),
            1 => format!("tomorrow at {time}"),
            n => format!("in {n} days at {time}"),
        }
    }
}

/// Previews the next firing, assuming the process is running at that minute.
/// `None` when reminders are disabled or no time is configured.
pub fn next_reminder(config: &ReminderConfig, now: NaiveDateTime) -> Option<NextReminder> {
    if !config.enabled {
        return None;
    }
    let earliest = config.earliest_time()?;
    let today = now.date();
    let eligible_on = eligible_from(config, today);
    if eligible_on > today {
        return Some(NextReminder {
            at: earliest.on(eligible_on),
        });
    }
    let current = ReminderTime::of(now);
    if let Some(time) = config.times.range(current..).next() {
        return Some(NextReminder {
            at: time.on(today),
        });
    }
    let tomorrow = today.succ_opt()?;
    Some(NextReminder {
        at: earliest.on(tomorrow),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(hh, mm, 0).unwrap()
    }

    fn enabled(cadence: u32, times: &[&str], last: Option<NaiveDate>) -> ReminderConfig {
        ReminderConfig {
            enabled: true,
            cadence_days: cadence,
            times: times.iter().map(|t| t.parse().unwrap()).collect(),
            last_fired_date: last,
        }
    }

    #[test]
    fn disabled_never_fires() {
        let mut config = enabled(1, &["20:00"], None);
        config.enabled = false;
        assert!(!should_fire(&config, date(2024, 1, 4)));
        config.last_fired_date = Some(date(2000, 1, 1));
        assert!(!should_fire(&config, date(2024, 1, 4)));
        assert_eq!(
            evaluate(&config, at(2024, 1, 4, 20, 0)),
            ReminderDecision::Disabled
        );
    }

    #[test]
    fn never_fired_is_eligible() {
        let config = enabled(30, &["20:00"], None);
        assert!(should_fire(&config, date(2024, 1, 4)));
    }

    #[test]
    fn cadence_boundary_is_inclusive() {
        let config = enabled(3, &["20:00"], Some(date(2024, 1, 1)));
        assert!(!should_fire(&config, date(2024, 1, 3)));
        assert!(should_fire(&config, date(2024, 1, 4)));
        assert!(should_fire(&config, date(2024, 2, 1)));
    }

    #[test]
    fn last_fired_in_the_future_is_not_eligible() {
        let config = enabled(1, &["20:00"], Some(date(2024, 1, 10)));
        assert!(!should_fire(&config, date(2024, 1, 4)));
        assert_eq!(
            evaluate(&config, at(2024, 1, 4, 20, 0)),
            ReminderDecision::NotEligible {
                eligible_on: date(2024, 1, 11)
            }
        );
    }

    #[test]
    fn due_only_in_the_matching_minute() {
        let config = enabled(3, &["20:00"], Some(date(2024, 1, 1)));
        let due = evaluate(&config, at(2024, 1, 4, 20, 0));
        assert_eq!(due, ReminderDecision::Due("20:00".parse().unwrap()));
        let late = date(2024, 1, 4).and_hms_opt(20, 0, 59).unwrap();
        assert!(evaluate(&config, late).is_due());
        assert_eq!(
            evaluate(&config, at(2024, 1, 4, 9, 0)),
            ReminderDecision::WaitingForTime
        );
        assert_eq!(
            evaluate(&config, at(2024, 1, 4, 20, 1)),
            ReminderDecision::WaitingForTime
        );
    }

    #[test]
    fn enabled_without_times_is_inert() {
        let config = enabled(1, &[], None);
        assert_eq!(
            evaluate(&config, at(2024, 1, 4, 20, 0)),
            ReminderDecision::NoTimes
        );
        assert_eq!(next_reminder(&config, at(2024, 1, 4, 20, 0)), None);
    }

    #[test]
    fn matching_time_picks_the_configured_minute() {
        let config = enabled(1, &["08:00", "20:00"], None);
        assert_eq!(
            matching_time(&config, at(2024, 1, 4, 8, 0)),
            Some("08:00".parse().unwrap())
        );
        assert_eq!(matching_time(&config, at(2024, 1, 4, 12, 0)), None);
    }

    #[test]
    fn next_reminder_later_today() {
        let config = enabled(1, &["08:00", "20:00"], Some(date(2024, 1, 3)));
        let now = at(2024, 1, 4, 12, 30);
        let next = next_reminder(&config, now).unwrap();
        assert_eq!(next.at, at(2024, 1, 4, 20, 0));
        assert_eq!(next.describe(now.date()), "today at 20:00");
    }

    #[test]
    fn next_reminder_rolls_over_to_tomorrow() {
        let config = enabled(1, &["08:00"], None);
        let now = at(2024, 1, 4, 21, 0);
        let next = next_reminder(&config, now).unwrap();
        assert_eq!(next.at, at(2024, 1, 5, 8, 0));
        assert_eq!(next.describe(now.date()), "tomorrow at 08:00");
    }

    #[test]
    fn next_reminder_waits_for_the_cadence() {
        let config = enabled(5, &["20:00", "07:30"], Some(date(2024, 1, 4)));
        let now = at(2024, 1, 4, 20, 1);
        let next = next_reminder(&config, now).unwrap();
        assert_eq!(next.at, at(2024, 1, 9, 7, 30));
        assert_eq!(next.describe(now.date()), "in 5 days at 07:30");
    }

    #[test]
    fn next_reminder_includes_the_current_minute() {
        let config = enabled(1, &["20:00"], None);
        let now = at(2024, 1, 4, 20, 0);
        assert_eq!(next_reminder(&config, now).unwrap().at, now);
    }
}
