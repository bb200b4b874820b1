use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Stores user-configurable CLI preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the profile data. Defaults to `<home>/data`.
    pub data_root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// `tracing` filter directives used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,

    #[serde(default = "Config::default_check_interval_secs")]
    pub reminder_check_interval_secs: u64,

    /// Answer to the notification permission prompt. `None` until asked.
    #[serde(default)]
    pub notifications_allowed: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: Self::default_currency_symbol(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_root: None,
            log_filter: None,
            reminder_check_interval_secs: Self::default_check_interval_secs(),
            notifications_allowed: None,
        }
    }
}

impl Config {
    pub fn default_currency_symbol() -> String {
        "R$".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_check_interval_secs() -> u64 {
        60
    }

    /// Interval between reminder checks; never shorter than one second.
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_check_interval_secs.max(1))
    }

    pub fn resolve_data_root(&self, home: &Path) -> PathBuf {
        match &self.data_root {
            Some(path) => path.clone(),
            None => home.join("data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"currency_symbol":"€"}"#).unwrap();
        assert_eq!(cfg.currency_symbol, "€");
        assert_eq!(cfg.reminder_check_interval_secs, 60);
        assert_eq!(cfg.notifications_allowed, None);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let cfg = Config {
            reminder_check_interval_secs: 0,
            ..Config::default()
        };
        assert_eq!(cfg.check_interval(), Duration::from_secs(1));
    }

    #[test]
    fn data_root_defaults_under_home() {
        let cfg = Config::default();
        assert_eq!(
            cfg.resolve_data_root(Path::new("/tmp/pb")),
            PathBuf::from("/tmp/pb/data")
        );
    }
}
