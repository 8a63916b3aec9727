//! Application State
//!
//! Everything a command needs, built once at startup and passed explicitly.

use std::path::PathBuf;

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::services::contact_store::ContactWaveStore;
use crate::sources::{ExternalSources, SnapshotSources};
use crate::storage::{ConfigService, Database};
use crate::utils::error::AppResult;

/// Path overrides for [`AppState::open`]. Unset fields fall back to the
/// config file, then to the defaults under `~/.heatwave`.
#[derive(Debug, Clone, Default)]
pub struct StateOptions {
    pub config_path: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub sources_path: Option<PathBuf>,
}

/// Application state shared by all commands
pub struct AppState {
    /// Configuration service for app settings
    config: ConfigService,
    /// SQLite database with connection pool
    database: Database,
    /// Contact/wave store over the database and external sources
    store: ContactWaveStore,
    /// Whether a sources snapshot was loaded
    sources_loaded: bool,
}

impl AppState {
    /// Open the config, the database and the sources snapshot
    pub fn open(options: StateOptions) -> AppResult<Self> {
        let config = match options.config_path {
            Some(path) => ConfigService::open(path)?,
            None => ConfigService::new()?,
        };

        let database = match options
            .database_path
            .or_else(|| config.get_config().database_file.clone())
        {
            Some(path) => Database::new(&path)?,
            None => Database::open_default()?,
        };

        let sources_path = options
            .sources_path
            .or_else(|| config.get_config().sources_file.clone());
        let (snapshot, sources_loaded) = match sources_path {
            Some(path) => (SnapshotSources::load(&path)?, true),
            None => {
                tracing::warn!("no sources file configured, directory and call history are empty");
                (SnapshotSources::default(), false)
            }
        };

        Ok(Self::from_parts(
            config,
            database,
            ExternalSources::from_snapshot(snapshot),
            sources_loaded,
        ))
    }

    /// Assemble the state from already opened parts
    pub fn from_parts(
        config: ConfigService,
        database: Database,
        sources: ExternalSources,
        sources_loaded: bool,
    ) -> Self {
        let store =
            ContactWaveStore::from_database(&database, sources, config.get_config().scan_settings());
        Self {
            config,
            database,
            store,
            sources_loaded,
        }
    }

    pub fn store(&self) -> &ContactWaveStore {
        &self.store
    }

    pub fn sources(&self) -> &ExternalSources {
        self.store.sources()
    }

    /// Get the current configuration
    pub fn config(&self) -> &AppConfig {
        self.config.get_config()
    }

    /// Update configuration; scan settings take effect immediately
    pub fn update_config(&mut self, update: SettingsUpdate) -> AppResult<AppConfig> {
        let updated = self.config.update_config(update)?;
        self.store = ContactWaveStore::from_database(
            &self.database,
            self.store.sources().clone(),
            updated.scan_settings(),
        );
        Ok(updated)
    }

    /// Check if database is healthy
    pub fn is_database_healthy(&self) -> bool {
        self.database.is_healthy()
    }

    /// Check if config is healthy
    pub fn is_config_healthy(&self) -> bool {
        self.config.path().exists() && self.config.get_config().validate().is_ok()
    }

    pub fn is_sources_loaded(&self) -> bool {
        self.sources_loaded
    }
}
