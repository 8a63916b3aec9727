//! Wave Models
//!
//! A wave is a named target re-contact interval ("Close friends: 7 days").

use heatwave_core::{WaveId, Wavelength};
use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

/// A named re-contact interval.
///
/// Fields are read-only; changes go through [`WaveFields`] and
/// [`Wave::apply`] (or `ContactWaveStore::modify_wave` to persist them).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    id: Option<WaveId>,
    name: String,
    wavelength: Wavelength,
}

/// Partial update for a [`Wave`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveFields {
    pub id: Option<WaveId>,
    pub name: Option<String>,
    pub wavelength: Option<Wavelength>,
}

impl WaveFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: WaveId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn wavelength(mut self, wavelength: Wavelength) -> Self {
        self.wavelength = Some(wavelength);
        self
    }

    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.wavelength.is_none()
    }
}

impl Wave {
    /// An unpersisted wave
    pub fn new(name: impl Into<String>, wavelength: Wavelength) -> AppResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            id: None,
            name,
            wavelength,
        })
    }

    /// Build a wave from a fully populated skeleton.
    pub fn from_fields(fields: WaveFields) -> AppResult<Self> {
        let name = fields
            .name
            .ok_or_else(|| AppError::validation("Wave name is required"))?;
        let wavelength = fields
            .wavelength
            .ok_or_else(|| AppError::validation("Wave wavelength is required"))?;
        let mut wave = Self::new(name, wavelength)?;
        wave.id = fields.id;
        Ok(wave)
    }

    pub(crate) fn persisted(id: WaveId, name: String, wavelength: Wavelength) -> Self {
        Self {
            id: Some(id),
            name,
            wavelength,
        }
    }

    pub fn id(&self) -> Option<WaveId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wavelength(&self) -> Wavelength {
        self.wavelength
    }

    /// Merge the set fields of `fields` into this wave.
    ///
    /// Validation happens before anything is changed.
    pub fn apply(&mut self, fields: WaveFields) -> AppResult<()> {
        if let Some(name) = &fields.name {
            validate_name(name)?;
        }
        if let Some(id) = fields.id {
            self.id = Some(id);
        }
        if let Some(name) = fields.name {
            self.name = name;
        }
        if let Some(wavelength) = fields.wavelength {
            self.wavelength = wavelength;
        }
        Ok(())
    }
}

impl std::fmt::Display for Wave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Wave '{}', wavelength: {}", self.name, self.wavelength)
    }
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Wave name cannot be empty"));
    }
    Ok(())
}
