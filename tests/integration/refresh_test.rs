//! Last-Contact Refresh Integration Tests
//!
//! Alias resolution, number normalization and call filtering working together
//! through `refresh_last_contact`.

use std::sync::Arc;

use heatwave::models::settings::ScanSettings;
use heatwave::services::ContactWaveStore;
use heatwave::sources::{ExternalSources, SnapshotSources};
use heatwave::storage::Database;
use heatwave::AppError;
use heatwave_core::{
    CallEntry, CallFilter, CallHistory, CallType, CoreError, CoreResult, DirectoryId,
    PhoneRecord, SECONDS_PER_DAY,
};

use crate::common::{call, person, sample_snapshot, sample_store, NOW};

fn store_with_scan(scan: ScanSettings) -> ContactWaveStore {
    let db = Database::new_in_memory().unwrap();
    ContactWaveStore::from_database(&db, ExternalSources::from_snapshot(sample_snapshot()), scan)
}

#[test]
fn test_refresh_spans_all_aliases() {
    let store = sample_store();
    let ada = store.create_contact(DirectoryId(1)).unwrap();

    // The latest qualifying call is on the second alias, in another format
    let last = store.refresh_last_contact(&ada).unwrap();
    assert_eq!(last, Some(NOW - 2 * SECONDS_PER_DAY));
}

#[test]
fn test_refresh_skips_short_calls() {
    let store = sample_store();
    let grace = store.create_contact(DirectoryId(2)).unwrap();
    assert_eq!(
        store.refresh_last_contact(&grace).unwrap(),
        Some(NOW - 40 * SECONDS_PER_DAY)
    );
}

#[test]
fn test_refresh_respects_scan_settings() {
    let store = store_with_scan(ScanSettings {
        min_call_duration_secs: 0,
        exclude_missed_calls: false,
    });
    let ada = store.create_contact(DirectoryId(1)).unwrap();
    let grace = store.create_contact(DirectoryId(2)).unwrap();

    assert_eq!(
        store.refresh_last_contact(&ada).unwrap(),
        Some(NOW - SECONDS_PER_DAY)
    );
    assert_eq!(
        store.refresh_last_contact(&grace).unwrap(),
        Some(NOW - 30 * SECONDS_PER_DAY)
    );
}

#[test]
fn test_refresh_contact_without_numbers() {
    let store = sample_store();
    let linus = store.create_contact(DirectoryId(3)).unwrap();
    assert_eq!(store.refresh_last_contact(&linus).unwrap(), None);
}

#[test]
fn test_refresh_is_persisted_and_listed() {
    let store = sample_store();
    store.add_contacts(&[DirectoryId(1), DirectoryId(2), DirectoryId(3)]);

    let results = store.refresh_all().unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|(_, result)| result.is_ok()));

    let mut tracked = store.list_tracked().unwrap();
    tracked.sort_by_key(|c| c.directory_id());
    let cached: Vec<_> = tracked.iter().map(|c| c.last_contact()).collect();
    assert_eq!(
        cached,
        vec![
            Some(NOW - 2 * SECONDS_PER_DAY),
            Some(NOW - 40 * SECONDS_PER_DAY),
            None
        ]
    );
}

#[test]
fn test_refresh_untracked_contact_is_not_found() {
    let store = sample_store();
    let ada = store.create_contact(DirectoryId(1)).unwrap();
    store.delete_contact(DirectoryId(1)).unwrap();
    let err = store.refresh_last_contact(&ada).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_tightened_filter_moves_cached_time_back() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("heatwave.db");
    let snapshot = SnapshotSources {
        people: vec![person(1, "Ada", vec![vec![PhoneRecord::new("555-123-4567")]])],
        calls: vec![
            call("5551234567", 100, 300, CallType::Outgoing),
            call("5551234567", 200, 5, CallType::Outgoing),
        ],
    };
    let open = |min_call_duration_secs| {
        let db = Database::new(&path).unwrap();
        ContactWaveStore::from_database(
            &db,
            ExternalSources::from_snapshot(snapshot.clone()),
            ScanSettings {
                min_call_duration_secs,
                exclude_missed_calls: true,
            },
        )
    };

    let lax = open(0);
    let ada = lax.create_contact(DirectoryId(1)).unwrap();
    assert_eq!(lax.refresh_last_contact(&ada).unwrap(), Some(200));

    let strict = open(120);
    let scanned = strict
        .sources()
        .scanner()
        .most_recent_contact(["5551234567"], 120, true)
        .unwrap();
    assert_eq!(scanned, Some(100));
    assert_eq!(strict.refresh_last_contact(&ada).unwrap(), scanned);

    let stored = strict.fetch_contact(DirectoryId(1)).unwrap().unwrap();
    assert_eq!(stored.last_contact(), Some(100));
}

struct OfflineHistory;

impl CallHistory for OfflineHistory {
    fn matching(&self, _filter: &CallFilter) -> CoreResult<Vec<CallEntry>> {
        Err(CoreError::source_unavailable("call log permission revoked"))
    }
}

#[test]
fn test_unavailable_history_is_reported_not_never() {
    let mut sources = ExternalSources::from_snapshot(sample_snapshot());
    sources.history = Arc::new(OfflineHistory);
    let db = Database::new_in_memory().unwrap();
    let store = ContactWaveStore::from_database(&db, sources, ScanSettings::default());

    let ada = store.create_contact(DirectoryId(1)).unwrap();
    let err = store.refresh_last_contact(&ada).unwrap_err();
    assert!(err.is_source_unavailable());

    let stored = store.fetch_contact(DirectoryId(1)).unwrap().unwrap();
    assert_eq!(stored.last_contact(), None);
}
