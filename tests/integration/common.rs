//! Shared fixtures for the integration tests

use heatwave::models::settings::ScanSettings;
use heatwave::services::ContactWaveStore;
use heatwave::sources::{ExternalSources, SnapshotAlias, SnapshotPerson, SnapshotSources};
use heatwave::storage::Database;
use heatwave_core::{
    CallEntry, CallType, DirectoryId, PhoneRecord, RawAliasId, Timestamp, SECONDS_PER_DAY,
};

/// Fixed "now" used by ranking tests
pub const NOW: Timestamp = 20_000 * SECONDS_PER_DAY;

pub fn person(id: i64, name: &str, aliases: Vec<Vec<PhoneRecord>>) -> SnapshotPerson {
    SnapshotPerson {
        id: DirectoryId(id),
        display_name: name.to_string(),
        aliases: aliases
            .into_iter()
            .enumerate()
            .map(|(i, phones)| SnapshotAlias {
                id: RawAliasId(id * 100 + i as i64),
                phones,
            })
            .collect(),
    }
}

pub fn call(number: &str, timestamp: Timestamp, duration_secs: i64, call_type: CallType) -> CallEntry {
    CallEntry {
        number: number.to_string(),
        timestamp,
        duration_secs,
        call_type,
    }
}

/// Ada has two aliases, Grace one, Linus none with a number
pub fn sample_snapshot() -> SnapshotSources {
    SnapshotSources {
        people: vec![
            person(
                1,
                "Ada Lovelace",
                vec![
                    vec![PhoneRecord::new("(555) 123-4567")],
                    vec![PhoneRecord::primary("+1 555 999 0000")],
                ],
            ),
            person(2, "Grace Hopper", vec![vec![PhoneRecord::new("555-222-3333")]]),
            person(3, "Linus", vec![vec![]]),
        ],
        calls: vec![
            call("5551234567", NOW - 10 * SECONDS_PER_DAY, 300, CallType::Outgoing),
            call("15559990000", NOW - 2 * SECONDS_PER_DAY, 200, CallType::Incoming),
            call("5551234567", NOW - SECONDS_PER_DAY, 0, CallType::Missed),
            call("5552223333", NOW - 30 * SECONDS_PER_DAY, 60, CallType::Outgoing),
            call("5552223333", NOW - 40 * SECONDS_PER_DAY, 900, CallType::Outgoing),
        ],
    }
}

pub fn store_with(snapshot: SnapshotSources) -> ContactWaveStore {
    let db = Database::new_in_memory().unwrap();
    ContactWaveStore::from_database(
        &db,
        ExternalSources::from_snapshot(snapshot),
        ScanSettings::default(),
    )
}

pub fn sample_store() -> ContactWaveStore {
    store_with(sample_snapshot())
}
