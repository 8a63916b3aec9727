//! Settings Models
//!
//! Application configuration and settings data structures.

use std::path::PathBuf;

use heatwave_core::DEFAULT_MIN_CALL_DURATION_SECS;
use serde::{Deserialize, Serialize};

/// Application configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Calls shorter than this (seconds) are not counted as contact
    pub min_call_duration_secs: i64,
    /// Ignore missed calls when looking for the last contact
    pub exclude_missed_calls: bool,
    /// Refresh last-contact timestamps from the call history before ranking
    pub refresh_on_rank: bool,
    /// Snapshot file backing the external directory and call history
    #[serde(default)]
    pub sources_file: Option<PathBuf>,
    /// Override for the database location
    #[serde(default)]
    pub database_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            min_call_duration_secs: DEFAULT_MIN_CALL_DURATION_SECS,
            exclude_missed_calls: true,
            refresh_on_rank: true,
            sources_file: None,
            database_file: None,
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub min_call_duration_secs: Option<i64>,
    pub exclude_missed_calls: Option<bool>,
    pub refresh_on_rank: Option<bool>,
    pub sources_file: Option<PathBuf>,
    pub database_file: Option<PathBuf>,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(duration) = update.min_call_duration_secs {
            self.min_call_duration_secs = duration;
        }
        if let Some(exclude) = update.exclude_missed_calls {
            self.exclude_missed_calls = exclude;
        }
        if let Some(refresh) = update.refresh_on_rank {
            self.refresh_on_rank = refresh;
        }
        if let Some(path) = update.sources_file {
            self.sources_file = Some(path);
        }
        if let Some(path) = update.database_file {
            self.database_file = Some(path);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_call_duration_secs < 0 {
            return Err(format!(
                "min_call_duration_secs cannot be negative, got {}",
                self.min_call_duration_secs
            ));
        }

        if let Some(path) = &self.sources_file {
            if path.as_os_str().is_empty() {
                return Err("sources_file cannot be an empty path".to_string());
            }
        }

        Ok(())
    }

    /// Scan settings handed to the contact store
    pub fn scan_settings(&self) -> ScanSettings {
        ScanSettings {
            min_call_duration_secs: self.min_call_duration_secs,
            exclude_missed_calls: self.exclude_missed_calls,
        }
    }
}

/// Call history filter parameters used when refreshing last-contact times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    pub min_call_duration_secs: i64,
    pub exclude_missed_calls: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        AppConfig::default().scan_settings()
    }
}
