//! Contact/Wave Store Integration Tests
//!
//! Lifecycle of waves and tracked contacts through the public store API,
//! including the delete-wave cascade and persistence across reopen.

use heatwave::models::contact::ContactFields;
use heatwave::models::settings::ScanSettings;
use heatwave::models::wave::WaveFields;
use heatwave::services::ContactWaveStore;
use heatwave::sources::{ExternalSources, SnapshotSources};
use heatwave::storage::Database;
use heatwave::AppError;
use heatwave_core::{DirectoryId, WaveId, Wavelength};

use crate::common::{sample_store, store_with};

fn days(n: i64) -> Wavelength {
    Wavelength::from_days(n).unwrap()
}

// ============================================================================
// Waves
// ============================================================================

#[test]
fn test_wave_get_or_create_by_name() {
    let store = sample_store();
    let week = Wavelength::from_secs(604_800).unwrap();

    let first = store.create_or_get_wave("Family", week).unwrap();
    let second = store.create_or_get_wave("Family", week).unwrap();

    assert_eq!(first.id(), second.id());
    assert_eq!(store.list_waves().unwrap().len(), 1);
}

#[test]
fn test_existing_wave_keeps_its_wavelength() {
    let store = sample_store();
    let original = store.create_or_get_wave("Friends", days(30)).unwrap();
    let again = store.create_or_get_wave("Friends", days(2)).unwrap();
    assert_eq!(again, original);
}

#[test]
fn test_invalid_wavelength_never_reaches_the_store() {
    assert!(Wavelength::from_secs(0).is_err());
    assert!(Wavelength::from_days(-3).is_err());
}

#[test]
fn test_list_waves_sorted_by_name() {
    let store = sample_store();
    for name in ["work", "Family", "acquaintances"] {
        store.create_or_get_wave(name, days(7)).unwrap();
    }
    let names: Vec<String> = store
        .list_waves()
        .unwrap()
        .iter()
        .map(|w| w.name().to_string())
        .collect();
    assert_eq!(names, vec!["acquaintances", "Family", "work"]);
}

#[test]
fn test_modify_wave_changes_wavelength_for_members() {
    let store = sample_store();
    let mut wave = store.create_or_get_wave("Family", days(7)).unwrap();
    store.create_contact(DirectoryId(1)).unwrap();
    store.assign_wave(DirectoryId(1), wave.id()).unwrap();

    store
        .modify_wave(&mut wave, WaveFields::new().wavelength(days(3)), true)
        .unwrap();

    let contact = store.fetch_contact(DirectoryId(1)).unwrap().unwrap();
    assert_eq!(contact.wave().unwrap().wavelength(), days(3));
}

// ============================================================================
// Contacts
// ============================================================================

#[test]
fn test_create_contact_twice_single_row() {
    let store = sample_store();
    store.create_contact(DirectoryId(2)).unwrap();
    store.create_contact(DirectoryId(2)).unwrap();

    let tracked = store.list_tracked().unwrap();
    assert_eq!(tracked.len(), 1);
    assert_eq!(tracked[0].directory_id(), DirectoryId(2));
    assert!(tracked[0].wave().is_none());
    assert!(tracked[0].last_contact().is_none());
}

#[test]
fn test_modify_contact_without_persist_is_local() {
    let store = sample_store();
    let mut contact = store.create_contact(DirectoryId(1)).unwrap();
    store
        .modify_contact(&mut contact, ContactFields::new().last_contact(Some(42)), false)
        .unwrap();

    assert_eq!(contact.last_contact(), Some(42));
    let stored = store.fetch_contact(DirectoryId(1)).unwrap().unwrap();
    assert_eq!(stored.last_contact(), None);
}

#[test]
fn test_modify_deleted_contact_is_not_found() {
    let store = sample_store();
    let mut contact = store.create_contact(DirectoryId(1)).unwrap();
    store.delete_contact(DirectoryId(1)).unwrap();

    let err = store
        .modify_contact(&mut contact, ContactFields::new().last_contact(Some(1)), true)
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_assign_and_clear_wave() {
    let store = sample_store();
    let wave = store.create_or_get_wave("Family", days(7)).unwrap();
    store.create_contact(DirectoryId(1)).unwrap();

    let assigned = store.assign_wave(DirectoryId(1), wave.id()).unwrap();
    assert_eq!(assigned.wave().map(|w| w.name()), Some("Family"));

    let cleared = store.assign_wave(DirectoryId(1), None).unwrap();
    assert!(cleared.wave().is_none());
    assert_eq!(store.wave_member_count(&wave).unwrap(), 0);
}

#[test]
fn test_assign_nonexistent_wave() {
    let store = sample_store();
    store.create_contact(DirectoryId(1)).unwrap();
    let err = store.assign_wave(DirectoryId(1), Some(WaveId(404))).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// ============================================================================
// Delete-wave cascade
// ============================================================================

#[test]
fn test_delete_wave_unassigns_every_member() {
    let store = sample_store();
    let family = store.create_or_get_wave("Family", days(7)).unwrap();
    let outcome = store.add_contacts(&[DirectoryId(1), DirectoryId(2), DirectoryId(3)]);
    assert!(outcome.is_clean());
    for id in [1, 2, 3] {
        store.assign_wave(DirectoryId(id), family.id()).unwrap();
    }

    assert_eq!(store.delete_wave(&family).unwrap(), 3);

    assert!(store.fetch_wave(family.id().unwrap()).unwrap().is_none());
    let tracked = store.list_tracked().unwrap();
    assert_eq!(tracked.len(), 3);
    assert!(tracked.iter().all(|c| c.wave().is_none()));
}

#[test]
fn test_deleted_wave_name_can_be_reused() {
    let store = sample_store();
    let old = store.create_or_get_wave("Family", days(7)).unwrap();
    store.delete_wave(&old).unwrap();

    let new = store.create_or_get_wave("Family", days(1)).unwrap();
    assert_ne!(new.id(), old.id());
    assert_eq!(new.wavelength(), days(1));
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_state_survives_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("heatwave.db");
    let open = || {
        let db = Database::new(&path).unwrap();
        ContactWaveStore::from_database(
            &db,
            ExternalSources::from_snapshot(SnapshotSources::default()),
            ScanSettings::default(),
        )
    };

    {
        let store = open();
        let wave = store.create_or_get_wave("Family", days(7)).unwrap();
        store.create_contact(DirectoryId(9)).unwrap();
        store.assign_wave(DirectoryId(9), wave.id()).unwrap();
    }

    let store = open();
    let contact = store.fetch_contact(DirectoryId(9)).unwrap().unwrap();
    assert_eq!(contact.wave().map(|w| w.name()), Some("Family"));
}

#[test]
fn test_clone_shares_the_database() {
    let store = store_with(SnapshotSources::default());
    let clone = store.clone();
    clone.create_contact(DirectoryId(5)).unwrap();
    assert!(store.fetch_contact(DirectoryId(5)).unwrap().is_some());
}
