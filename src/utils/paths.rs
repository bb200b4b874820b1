use dirs::home_dir;
use std::{env, path::PathBuf};

/// Overrides the application home directory.
pub const HOME_ENV: &str = "PURSEBOOK_HOME";
const DEFAULT_DIR_NAME: &str = ".pursebook";

/// Returns the application directory, defaulting to `~/.pursebook`.
pub fn app_home() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}
