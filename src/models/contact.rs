//! Contact Models
//!
//! A tracked person. Identity is the local row id plus the external directory
//! id; the display name is never stored here and has to be re-resolved from
//! the directory each time it is shown.

use heatwave_core::{ContactId, DirectoryId, Staleness, Timestamp};
use serde::{Deserialize, Serialize};

use crate::models::wave::Wave;

/// A tracked contact with its wave assignment and cached last contact time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    id: ContactId,
    directory_id: DirectoryId,
    wave: Option<Wave>,
    last_contact: Option<Timestamp>,
}

/// Partial update for a [`Contact`]. `None` leaves a field unchanged.
///
/// Both fields are nullable on the contact itself, so `Some(None)` clears
/// them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactFields {
    pub wave: Option<Option<Wave>>,
    pub last_contact: Option<Option<Timestamp>>,
}

impl ContactFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wave(mut self, wave: Wave) -> Self {
        self.wave = Some(Some(wave));
        self
    }

    pub fn clear_wave(mut self) -> Self {
        self.wave = Some(None);
        self
    }

    pub fn last_contact(mut self, timestamp: Option<Timestamp>) -> Self {
        self.last_contact = Some(timestamp);
        self
    }
}

impl Contact {
    pub(crate) fn from_row(
        id: ContactId,
        directory_id: DirectoryId,
        wave: Option<Wave>,
        last_contact: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            directory_id,
            wave,
            last_contact,
        }
    }

    pub fn id(&self) -> ContactId {
        self.id
    }

    pub fn directory_id(&self) -> DirectoryId {
        self.directory_id
    }

    pub fn wave(&self) -> Option<&Wave> {
        self.wave.as_ref()
    }

    /// Cached timestamp of the last qualifying call, possibly stale
    pub fn last_contact(&self) -> Option<Timestamp> {
        self.last_contact
    }

    /// Staleness at `now`, or `None` if the contact has no wave.
    pub fn staleness(&self, now: Timestamp) -> Option<Staleness> {
        self.wave
            .as_ref()
            .map(|wave| heatwave_core::score(self.last_contact, wave.wavelength(), now))
    }

    /// Merge the set fields of `fields` into this contact.
    pub fn apply(&mut self, fields: ContactFields) {
        if let Some(wave) = fields.wave {
            self.wave = wave;
        }
        if let Some(last_contact) = fields.last_contact {
            self.last_contact = last_contact;
        }
    }
}
