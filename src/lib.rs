//! Heatwave
//!
//! Keeps track of how long it has been since you last spoke to the people you
//! care about. Contacts are put on waves (target re-contact intervals) and
//! ranked by how overdue they are, using the call history as the record of
//! who was reached when.
//!
//! The crate includes:
//! - Command handlers used by the CLI
//! - The contact/wave store, ranking and selection services
//! - Storage layer (SQLite, Config)
//! - Snapshot-backed external sources
//! - Data models and utilities
//!
//! Pure logic (normalization, alias resolution, call scanning, scoring) lives
//! in `heatwave-core`.

pub mod commands;
pub mod models;
pub mod services;
pub mod sources;
pub mod state;
pub mod storage;
pub mod utils;

pub use heatwave_core::{
    normalize, score, CoreError, DirectoryId, Staleness, Timestamp, WaveId, Wavelength,
};
pub use models::contact::{Contact, ContactFields};
pub use models::response::CommandResponse;
pub use models::settings::{AppConfig, SettingsUpdate};
pub use models::wave::{Wave, WaveFields};
pub use services::{ContactWaveStore, RankedContact};
pub use state::{AppState, StateOptions};
pub use utils::error::{AppError, AppResult};
