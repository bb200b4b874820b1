//! Reminder configuration and time-of-day values.

use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{de::Deserializer, Deserialize, Serialize, Serializer};

use crate::ValidationError;

/// Cadence choices offered by the settings screen. Any positive value is accepted.
pub const CADENCE_PRESETS: [u32; 5] = [3, 5, 10, 15, 30];

pub const DEFAULT_CADENCE_DAYS: u32 = 1;
pub const DEFAULT_REMINDER_TIME: &str = "20:00";

/// A time of day with minute resolution, written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReminderTime(NaiveTime);

impl ReminderTime {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(ReminderTime)
    }

    /// Truncates a wall-clock instant to its minute.
    pub fn of(now: NaiveDateTime) -> Self {
        ReminderTime(NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or_default())
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    /// Returns `true` when `now` falls inside this minute.
    pub fn matches(self, now: NaiveDateTime) -> bool {
        now.hour() == self.hour() && now.minute() == self.minute()
    }

    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }
}

impl FromStr for ReminderTime {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let (hour, minute) = trimmed
            .split_once(':')
            .ok_or_else(|| ValidationError::InvalidTime(raw.to_string()))?;
        if hour.is_empty()
            || hour.len() > 2
            || minute.len() != 2
            || !hour.chars().chain(minute.chars()).all(|c| c.is_ascii_digit())
        {
            return Err(ValidationError::InvalidTime(raw.to_string()));
        }
        let hour: u32 = hour
            .parse()
            .map_err(|_| ValidationError::InvalidTime(raw.to_string()))?;
        let minute: u32 = minute
            .parse()
            .map_err(|_| ValidationError::InvalidTime(raw.to_string()))?;
        ReminderTime::from_hm(hour, minute).ok_or_else(|| ValidationError::InvalidTime(raw.to_string()))
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ReminderTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReminderTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// User-configured reminder cadence and times of day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReminderConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "ReminderConfig::default_cadence_days")]
    pub cadence_days: u32,
    #[serde(default)]
    pub times: BTreeSet<ReminderTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_fired_date: Option<NaiveDate>,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        let mut times = BTreeSet::new();
        if let Ok(time) = DEFAULT_REMINDER_TIME.parse() {
            times.insert(time);
        }
        Self {
            enabled: false,
            cadence_days: DEFAULT_CADENCE_DAYS,
            times,
            last_fired_date: None,
        }
    }
}

impl ReminderConfig {
    pub fn default_cadence_days() -> u32 {
        DEFAULT_CADENCE_DAYS
    }

    pub fn with_cadence(mut self, days: u32) -> Self {
        self.cadence_days = days;
        self
    }

    /// Adds a time of day, returning whether it was newly inserted.
    pub fn add_time(&mut self, time: ReminderTime) -> bool {
        self.times.insert(time)
    }

    /// Removes a time of day, returning whether it was present.
    pub fn remove_time(&mut self, time: ReminderTime) -> bool {
        self.times.remove(&time)
    }

    pub fn earliest_time(&self) -> Option<ReminderTime> {
        self.times.iter().next().copied()
    }

    /// Enabled but without any time of day: valid, yet it can never fire.
    pub fn is_inert(&self) -> bool {
        self.enabled && self.times.is_empty()
    }

    /// Returns a copy marked as fired on `date`.
    pub fn fired_on(&self, date: NaiveDate) -> Self {
        Self {
            last_fired_date: Some(date),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cadence_days == 0 {
            return Err(ValidationError::ZeroCadence);
        }
        Ok(())
    }

    pub fn times_label(&self) -> String {
        self.times
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn cadence_label(&self) -> String {
        if self.cadence_days == 1 {
            "every day".into()
        } else {
            format!("every {} days", self.cadence_days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_pads_times() {
        let time: ReminderTime = "8:05".parse().unwrap();
        assert_eq!(time.to_string(), "08:05");
        assert!("24:00".parse::<ReminderTime>().is_err());
        assert!("20:0".parse::<ReminderTime>().is_err());
        assert!("20h00".parse::<ReminderTime>().is_err());
        assert!("20:00:00".parse::<ReminderTime>().is_err());
    }

    #[test]
    fn times_stay_unique_and_ordered() {
        let mut config = ReminderConfig::default();
        assert!(config.add_time("08:30".parse().unwrap()));
        assert!(!config.add_time("20:00".parse().unwrap()));
        assert!(config.add_time("12:00".parse().unwrap()));
        assert_eq!(config.times_label(), "08:30, 12:00, 20:00");
        assert!(config.remove_time("12:00".parse().unwrap()));
        assert!(!config.remove_time("12:00".parse().unwrap()));
    }

    #[test]
    fn default_is_disabled_with_one_time() {
        let config = ReminderConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.times.len(), 1);
        assert_eq!(config.last_fired_date, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_cadence_is_rejected() {
        let config = ReminderConfig::default().with_cadence(0);
        assert_eq!(config.validate(), Err(ValidationError::ZeroCadence));
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut config = ReminderConfig {
            enabled: true,
            cadence_days: 3,
            ..ReminderConfig::default()
        };
        config.add_time("07:15".parse().unwrap());
        config.last_fired_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"07:15\""));
        let back: ReminderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ReminderConfig = serde_json::from_str(r#"{"enabled":true}"#).unwrap();
        assert_eq!(config.cadence_days, DEFAULT_CADENCE_DAYS);
        assert!(config.is_inert());
    }
}
