//! Wave Commands
//!
//! Commands for creating, listing, editing and deleting waves.

use heatwave_core::Wavelength;

use crate::models::response::{CommandResponse, WaveSummary};
use crate::models::wave::{Wave, WaveFields};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// List all waves with their member counts
pub fn list_waves(state: &AppState) -> CommandResponse<Vec<WaveSummary>> {
    let result: AppResult<Vec<WaveSummary>> = (|| {
        let store = state.store();
        store
            .list_waves()?
            .into_iter()
            .map(|wave| {
                let members = store.wave_member_count(&wave)?;
                Ok(WaveSummary { wave, members })
            })
            .collect()
    })();
    result.into()
}

/// Create a wave, or return the existing one with that name
pub fn create_wave(state: &AppState, name: &str, days: i64) -> CommandResponse<Wave> {
    let result = Wavelength::from_days(days)
        .map_err(AppError::from)
        .and_then(|wavelength| state.store().create_or_get_wave(name, wavelength));
    result.into()
}

/// Rename a wave and/or change its wavelength
pub fn update_wave(
    state: &AppState,
    name: &str,
    rename: Option<String>,
    days: Option<i64>,
) -> CommandResponse<Wave> {
    let result: AppResult<Wave> = (|| {
        let store = state.store();
        let mut wave = require_wave(state, name)?;

        let mut fields = WaveFields::new();
        if let Some(new_name) = rename {
            fields = fields.name(new_name);
        }
        if let Some(days) = days {
            fields = fields.wavelength(Wavelength::from_days(days)?);
        }
        if fields.is_empty() {
            return Err(AppError::validation("Nothing to update"));
        }

        store.modify_wave(&mut wave, fields, true)?;
        Ok(wave)
    })();
    result.into()
}

/// Delete a wave, unassigning its members. Returns how many were unassigned.
pub fn delete_wave(state: &AppState, name: &str) -> CommandResponse<usize> {
    let result = require_wave(state, name).and_then(|wave| state.store().delete_wave(&wave));
    result.into()
}

pub(crate) fn require_wave(state: &AppState, name: &str) -> AppResult<Wave> {
    state
        .store()
        .load_wave_by_name(name)?
        .ok_or_else(|| AppError::not_found(format!("Wave not found: {}", name)))
}
