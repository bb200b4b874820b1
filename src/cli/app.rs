use std::{path::PathBuf, sync::Arc};

use pursebook_config::{Config, ConfigManager};
use pursebook_core::{Persistence, Tracker};
use pursebook_storage_json::JsonFileStore;

use crate::{
    errors::CliError,
    notify::TerminalNotifier,
    output::{self, OutputPreferences, Presenter},
    utils::paths,
};

/// Everything a command needs: preferences, the opened profile and its store.
pub struct App {
    pub home: PathBuf,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub tracker: Tracker,
    pub presenter: Presenter,
    file_store: Option<JsonFileStore>,
}

impl App {
    /// Loads the configuration from the application home and opens the profile.
    /// An unusable data directory degrades to an in-memory session.
    pub fn open() -> Result<Self, CliError> {
        let home = paths::app_home();
        let config_manager = ConfigManager::with_base_dir(&home)?;
        let config = config_manager.load()?;
        crate::init(config.log_filter.as_deref());
        output::set_preferences(OutputPreferences {
            plain: !config.ui_color_enabled,
        });

        let data_root = config.resolve_data_root(&home);
        let (persistence, file_store) = match JsonFileStore::new(data_root.clone()) {
            Ok(store) => (Persistence::new(Box::new(store.clone())), Some(store)),
            Err(err) => {
                tracing::warn!(path = %data_root.display(), error = %err, "data directory unusable");
                output::warning(format!(
                    "Cannot use {}; changes will not be saved.",
                    data_root.display()
                ));
                (Persistence::in_memory(), None)
            }
        };
        let tracker = Tracker::open(Arc::new(persistence));
        let presenter = Presenter::new(&config.currency_symbol);

        Ok(Self {
            home,
            config_manager,
            config,
            tracker,
            presenter,
            file_store,
        })
    }

    pub fn file_store(&self) -> Result<&JsonFileStore, CliError> {
        self.file_store
            .as_ref()
            .ok_or_else(|| CliError::input("no data directory is available in this session"))
    }

    pub fn notifier(&self) -> TerminalNotifier<std::io::StdinLock<'static>, std::io::Stdout> {
        TerminalNotifier::stdio(
            self.config_manager.clone(),
            self.config.notifications_allowed,
        )
    }
}
