//! Contact/Wave Store
//!
//! The authoritative mapping from tracked contact to wave, on top of the
//! SQLite pool. Besides plain CRUD it owns the invariants the rest of the
//! application relies on:
//!
//! - creating a contact or a wave is idempotent (by directory id / by name)
//! - deleting a wave clears every assignment to it in the same transaction
//! - refreshed last-contact times are cached on the contact row
//!
//! External sources are injected at construction; nothing here is global.

use heatwave_core::{ContactId, DirectoryId, Timestamp, WaveId, Wavelength};
use rusqlite::{params, Connection, ErrorCode, Transaction};
use serde::{Deserialize, Serialize};

use crate::models::contact::{Contact, ContactFields};
use crate::models::settings::ScanSettings;
use crate::models::wave::{Wave, WaveFields};
use crate::sources::ExternalSources;
use crate::storage::database::{Database, DbConnection, DbPool};
use crate::utils::error::{AppError, AppResult};

const CONTACT_COLUMNS: &str = "c.id, c.external_id, c.last_contact_timestamp, w.id, w.name, w.wavelength
     FROM contacts c LEFT JOIN waves w ON w.id = c.wave_id";

/// Per-item result of a batch add/remove.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub succeeded: Vec<DirectoryId>,
    pub failed: Vec<(DirectoryId, String)>,
}

impl BatchOutcome {
    /// True if every item succeeded
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn record<T>(&mut self, id: DirectoryId, result: AppResult<T>) {
        match result {
            Ok(_) => self.succeeded.push(id),
            Err(e) => {
                tracing::warn!(directory_id = %id, error = %e, "batch item failed");
                self.failed.push((id, e.to_string()));
            }
        }
    }
}

/// Store for waves and tracked contacts
#[derive(Clone)]
pub struct ContactWaveStore {
    pool: DbPool,
    sources: ExternalSources,
    scan: ScanSettings,
}

impl ContactWaveStore {
    /// Create a store from a connection pool, the external sources and the
    /// call history filter settings
    pub fn new(pool: DbPool, sources: ExternalSources, scan: ScanSettings) -> Self {
        Self {
            pool,
            sources,
            scan,
        }
    }

    /// Create a store from a Database instance
    pub fn from_database(db: &Database, sources: ExternalSources, scan: ScanSettings) -> Self {
        Self::new(db.pool().clone(), sources, scan)
    }

    pub fn sources(&self) -> &ExternalSources {
        &self.sources
    }

    pub fn scan_settings(&self) -> ScanSettings {
        self.scan
    }

    fn get_connection(&self) -> AppResult<DbConnection> {
        self.pool
            .get()
            .map_err(|e| AppError::database(format!("Failed to get connection: {}", e)))
    }

    // ========================================================================
    // Wave Operations
    // ========================================================================

    /// Return the wave called `name`, creating it with `wavelength` if absent.
    ///
    /// If the wave already exists the given wavelength is ignored and the
    /// stored one is kept. Use [`modify_wave`](Self::modify_wave) to change it.
    pub fn create_or_get_wave(&self, name: &str, wavelength: Wavelength) -> AppResult<Wave> {
        let wave = Wave::new(name, wavelength)?;

        if let Some(existing) = self.load_wave_by_name(wave.name())? {
            if existing.wavelength() != wavelength {
                tracing::debug!(
                    name = %existing.name(),
                    stored = %existing.wavelength(),
                    requested = %wavelength,
                    "wave exists, keeping stored wavelength"
                );
            }
            return Ok(existing);
        }

        {
            let conn = self.get_connection()?;
            conn.execute(
                "INSERT INTO waves (name, wavelength) VALUES (?1, ?2)
                 ON CONFLICT(name) DO NOTHING",
                params![wave.name(), wave.wavelength().as_secs()],
            )?;
        } // connection released here

        let created = self
            .load_wave_by_name(wave.name())?
            .ok_or_else(|| AppError::internal("Failed to retrieve newly inserted wave"))?;
        tracing::info!(wave_id = ?created.id(), name = %created.name(), "created wave");
        Ok(created)
    }

    /// Get a wave by id
    pub fn fetch_wave(&self, id: WaveId) -> AppResult<Option<Wave>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT id, name, wavelength FROM waves WHERE id = ?1",
            params![id.0],
            row_to_wave,
        );

        match result {
            Ok(wave) => Ok(Some(wave)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// Get a wave by its unique name. Never creates one.
    pub fn load_wave_by_name(&self, name: &str) -> AppResult<Option<Wave>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT id, name, wavelength FROM waves WHERE name = ?1",
            params![name],
            row_to_wave,
        );

        match result {
            Ok(wave) => Ok(Some(wave)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// All waves, ordered by name
    pub fn list_waves(&self) -> AppResult<Vec<Wave>> {
        let conn = self.get_connection()?;
        let mut stmt =
            conn.prepare("SELECT id, name, wavelength FROM waves ORDER BY name COLLATE NOCASE")?;
        let waves = stmt
            .query_map([], row_to_wave)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(waves)
    }

    /// Number of contacts assigned to `wave`
    pub fn wave_member_count(&self, wave: &Wave) -> AppResult<usize> {
        let Some(id) = wave.id() else {
            return Ok(0);
        };
        let conn = self.get_connection()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM contacts WHERE wave_id = ?1",
            params![id.0],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Merge `fields` into `wave`, writing the row when `persist` is set.
    ///
    /// `wave` is left untouched if validation or the write fails.
    pub fn modify_wave(&self, wave: &mut Wave, fields: WaveFields, persist: bool) -> AppResult<()> {
        if let (Some(new_id), Some(current)) = (fields.id, wave.id()) {
            if new_id != current {
                return Err(AppError::validation("A saved wave cannot change its id"));
            }
        }

        let mut next = wave.clone();
        next.apply(fields)?;

        if persist {
            let id = next
                .id()
                .ok_or_else(|| AppError::validation("Cannot persist a wave that was never saved"))?;
            let conn = self.get_connection()?;
            let updated = conn
                .execute(
                    "UPDATE waves SET name = ?2, wavelength = ?3 WHERE id = ?1",
                    params![id.0, next.name(), next.wavelength().as_secs()],
                )
                .map_err(|e| {
                    if constraint_violation(&e) {
                        AppError::validation(format!(
                            "A wave named '{}' already exists",
                            next.name()
                        ))
                    } else {
                        AppError::from(e)
                    }
                })?;
            if updated == 0 {
                return Err(AppError::not_found(format!("Wave not found: {}", id)));
            }
            tracing::info!(wave_id = %id, name = %next.name(), wavelength = %next.wavelength(), "updated wave");
        }

        *wave = next;
        Ok(())
    }

    /// Delete `wave` and clear the assignment of every contact pointing to it.
    ///
    /// Both steps run in one transaction. On failure nothing is changed and
    /// `TransactionFailure` is returned. Deleting a wave that no longer exists
    /// is a no-op. Returns the number of contacts that were unassigned.
    pub fn delete_wave(&self, wave: &Wave) -> AppResult<usize> {
        let id = wave
            .id()
            .ok_or_else(|| AppError::validation("Cannot delete a wave that was never saved"))?;
        self.delete_wave_with(id, |_| Ok(()))
    }

    /// `delete_wave` with a hook that runs between clearing the assignments
    /// and deleting the wave row.
    fn delete_wave_with<F>(&self, id: WaveId, between: F) -> AppResult<usize>
    where
        F: FnOnce(&Transaction<'_>) -> AppResult<()>,
    {
        let conn = self.get_connection()?;
        match cascade_delete_wave(&conn, id, between) {
            Ok(cleared) => {
                tracing::info!(wave_id = %id, contacts_cleared = cleared, "deleted wave");
                Ok(cleared)
            }
            Err(e) => {
                tracing::warn!(wave_id = %id, error = %e, "wave deletion rolled back");
                Err(AppError::transaction(format!(
                    "Failed to delete wave {}: {}",
                    id, e
                )))
            }
        }
    }

    // ========================================================================
    // Contact Operations
    // ========================================================================

    /// Start tracking `directory_id`. Returns the existing record unchanged,
    /// without writing, if it is already tracked.
    pub fn create_contact(&self, directory_id: DirectoryId) -> AppResult<Contact> {
        if let Some(existing) = self.fetch_contact(directory_id)? {
            return Ok(existing);
        }

        {
            let conn = self.get_connection()?;
            conn.execute(
                "INSERT INTO contacts (external_id) VALUES (?1)
                 ON CONFLICT(external_id) DO NOTHING",
                params![directory_id.0],
            )?;
        } // connection released here

        tracing::info!(directory_id = %directory_id, "tracking contact");
        self.fetch_contact(directory_id)?
            .ok_or_else(|| AppError::internal("Failed to retrieve newly inserted contact"))
    }

    /// Stop tracking `directory_id`. Returns whether a row was removed.
    pub fn delete_contact(&self, directory_id: DirectoryId) -> AppResult<bool> {
        let conn = self.get_connection()?;
        let removed = conn.execute(
            "DELETE FROM contacts WHERE external_id = ?1",
            params![directory_id.0],
        )?;
        if removed > 0 {
            tracing::info!(directory_id = %directory_id, "untracked contact");
        }
        Ok(removed > 0)
    }

    /// Create every contact in `ids`; each item succeeds or fails on its own
    pub fn add_contacts(&self, ids: &[DirectoryId]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for &id in ids {
            outcome.record(id, self.create_contact(id));
        }
        outcome
    }

    /// Delete every contact in `ids`; each item succeeds or fails on its own
    pub fn remove_contacts(&self, ids: &[DirectoryId]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for &id in ids {
            outcome.record(id, self.delete_contact(id));
        }
        outcome
    }

    /// Get a tracked contact with its wave
    pub fn fetch_contact(&self, directory_id: DirectoryId) -> AppResult<Option<Contact>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            &format!("SELECT {} WHERE c.external_id = ?1", CONTACT_COLUMNS),
            params![directory_id.0],
            row_to_contact,
        );

        match result {
            Ok(contact) => Ok(Some(contact)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// Directory ids of every tracked contact
    pub fn tracked_directory_ids(&self) -> AppResult<Vec<DirectoryId>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare("SELECT external_id FROM contacts ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| Ok(DirectoryId(row.get(0)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Every tracked contact with its cached last contact time and wave.
    ///
    /// The order is unspecified; ranking is up to the caller.
    pub fn list_tracked(&self) -> AppResult<Vec<Contact>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&format!("SELECT {}", CONTACT_COLUMNS))?;
        let contacts = stmt
            .query_map([], row_to_contact)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(contacts)
    }

    /// Merge `fields` into `contact`, writing the row when `persist` is set.
    ///
    /// A wave being assigned must already be saved. `contact` is left
    /// untouched if the write fails.
    pub fn modify_contact(
        &self,
        contact: &mut Contact,
        fields: ContactFields,
        persist: bool,
    ) -> AppResult<()> {
        let mut next = contact.clone();
        next.apply(fields);

        if persist {
            let wave_id = match next.wave() {
                Some(wave) => {
                    let id = wave.id().ok_or_else(|| {
                        AppError::validation("Cannot assign a wave that was never saved")
                    })?;
                    if self.fetch_wave(id)?.is_none() {
                        return Err(AppError::not_found(format!("Wave not found: {}", id)));
                    }
                    Some(id.0)
                }
                None => None,
            };

            let conn = self.get_connection()?;
            let updated = conn.execute(
                "UPDATE contacts SET wave_id = ?2, last_contact_timestamp = ?3 WHERE id = ?1",
                params![next.id().0, wave_id, next.last_contact()],
            )?;
            if updated == 0 {
                return Err(AppError::not_found(format!(
                    "Contact not found: {}",
                    next.directory_id()
                )));
            }
            tracing::debug!(directory_id = %next.directory_id(), wave_id = ?wave_id, "updated contact");
        }

        *contact = next;
        Ok(())
    }

    /// Assign (or with `None`, unassign) the wave of a tracked contact
    pub fn assign_wave(
        &self,
        directory_id: DirectoryId,
        wave_id: Option<WaveId>,
    ) -> AppResult<Contact> {
        let mut contact = self
            .fetch_contact(directory_id)?
            .ok_or_else(|| AppError::not_found(format!("Contact not found: {}", directory_id)))?;

        let fields = match wave_id {
            Some(id) => {
                let wave = self
                    .fetch_wave(id)?
                    .ok_or_else(|| AppError::not_found(format!("Wave not found: {}", id)))?;
                ContactFields::new().wave(wave)
            }
            None => ContactFields::new().clear_wave(),
        };

        self.modify_contact(&mut contact, fields, true)?;
        Ok(contact)
    }

    // ========================================================================
    // Freshness
    // ========================================================================

    /// Resolve the last qualifying call with `contact` from the external
    /// sources, cache it on the contact row, and return it.
    ///
    /// The scanned value replaces whatever was cached, including with "never"
    /// (NULL) when no qualifying call is found. This is a blocking call. Source
    /// failures are returned, never turned into "never", and leave the cache
    /// untouched.
    pub fn refresh_last_contact(&self, contact: &Contact) -> AppResult<Option<Timestamp>> {
        let directory_id = contact.directory_id();
        let cached = self.cached_last_contact(directory_id)?;

        let numbers = self.sources.alias_resolver().all_phone_numbers(directory_id)?;
        let scanned = self.sources.scanner().most_recent_contact(
            &numbers,
            self.scan.min_call_duration_secs,
            self.scan.exclude_missed_calls,
        )?;

        if scanned != cached {
            let conn = self.get_connection()?;
            conn.execute(
                "UPDATE contacts SET last_contact_timestamp = ?2 WHERE external_id = ?1",
                params![directory_id.0, scanned],
            )?;
        }

        tracing::debug!(
            directory_id = %directory_id,
            numbers = numbers.len(),
            cached = ?cached,
            scanned = ?scanned,
            "refreshed last contact"
        );
        Ok(scanned)
    }

    /// Refresh every tracked contact, reporting each result separately
    pub fn refresh_all(&self) -> AppResult<Vec<(DirectoryId, AppResult<Option<Timestamp>>)>> {
        let contacts = self.list_tracked()?;
        Ok(contacts
            .iter()
            .map(|contact| (contact.directory_id(), self.refresh_last_contact(contact)))
            .collect())
    }

    /// Phone number to dial for a contact: its primary number, otherwise the
    /// first one found. Fails with `NoContactInfo` when there is none.
    pub fn dial_number(&self, directory_id: DirectoryId) -> AppResult<String> {
        Ok(self
            .sources
            .alias_resolver()
            .primary_phone_number(directory_id)?)
    }

    fn cached_last_contact(&self, directory_id: DirectoryId) -> AppResult<Option<Timestamp>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT last_contact_timestamp FROM contacts WHERE external_id = ?1",
            params![directory_id.0],
            |row| row.get::<_, Option<Timestamp>>(0),
        );

        match result {
            Ok(timestamp) => Ok(timestamp),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(AppError::not_found(format!(
                "Contact not found: {}",
                directory_id
            ))),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }
}

/// Clear assignments, run `between`, delete the wave row, commit.
///
/// Returning early drops the transaction, which rolls it back.
fn cascade_delete_wave<F>(conn: &Connection, id: WaveId, between: F) -> AppResult<usize>
where
    F: FnOnce(&Transaction<'_>) -> AppResult<()>,
{
    let tx = conn.unchecked_transaction()?;

    let cleared = tx.execute(
        "UPDATE contacts SET wave_id = NULL WHERE wave_id = ?1",
        params![id.0],
    )?;

    between(&tx)?;

    tx.execute("DELETE FROM waves WHERE id = ?1", params![id.0])?;
    tx.commit()?;
    Ok(cleared)
}

fn constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn wavelength_from_column(idx: usize, secs: i64) -> rusqlite::Result<Wavelength> {
    Wavelength::from_secs(secs).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Integer, Box::new(e))
    })
}

/// Helper function to convert a `waves` row to a Wave
fn row_to_wave(row: &rusqlite::Row) -> rusqlite::Result<Wave> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let wavelength = wavelength_from_column(2, row.get(2)?)?;
    Ok(Wave::persisted(WaveId(id), name, wavelength))
}

/// Helper function to convert a contacts/waves join row to a Contact
fn row_to_contact(row: &rusqlite::Row) -> rusqlite::Result<Contact> {
    let id: i64 = row.get(0)?;
    let external_id: i64 = row.get(1)?;
    let last_contact: Option<Timestamp> = row.get(2)?;
    let wave_id: Option<i64> = row.get(3)?;

    let wave = match wave_id {
        Some(wave_id) => {
            let name: String = row.get(4)?;
            let wavelength = wavelength_from_column(5, row.get(5)?)?;
            Some(Wave::persisted(WaveId(wave_id), name, wavelength))
        }
        None => None,
    };

    Ok(Contact::from_row(
        ContactId(id),
        DirectoryId(external_id),
        wave,
        last_contact,
    ))
}
