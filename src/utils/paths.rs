//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.
//! Everything lives under ~/.heatwave/.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Heatwave directory (~/.heatwave/)
pub fn heatwave_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".heatwave"))
}

/// Get the config file path (~/.heatwave/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(heatwave_dir()?.join("config.json"))
}

/// Get the database file path (~/.heatwave/heatwave.db)
pub fn database_path() -> AppResult<PathBuf> {
    Ok(heatwave_dir()?.join("heatwave.db"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the Heatwave directory, creating if it doesn't exist
pub fn ensure_heatwave_dir() -> AppResult<PathBuf> {
    let path = heatwave_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
