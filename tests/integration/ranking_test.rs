//! Ranking and Selection Integration Tests

use heatwave::services::{apply_selection, rank_contacts, selectable_contacts};
use heatwave::sources::SnapshotSources;
use heatwave_core::{DirectoryId, Staleness, Wavelength};

use crate::common::{sample_snapshot, sample_store, store_with, NOW};

fn days(n: i64) -> Wavelength {
    Wavelength::from_days(n).unwrap()
}

#[test]
fn test_rank_most_overdue_first() {
    let snapshot = sample_snapshot();
    let store = store_with(snapshot.clone());
    let weekly = store.create_or_get_wave("Weekly", days(7)).unwrap();
    let monthly = store.create_or_get_wave("Monthly", days(30)).unwrap();

    store.add_contacts(&[DirectoryId(1), DirectoryId(2), DirectoryId(3), DirectoryId(4)]);
    store.assign_wave(DirectoryId(1), weekly.id()).unwrap();
    store.assign_wave(DirectoryId(2), monthly.id()).unwrap();
    store.assign_wave(DirectoryId(3), weekly.id()).unwrap();

    let ranked = rank_contacts(&store, &snapshot, NOW, true).unwrap();
    let order: Vec<i64> = ranked.iter().map(|r| r.contact.directory_id().0).collect();
    assert_eq!(order, vec![3, 2, 1, 4]);

    assert_eq!(ranked[0].staleness, Some(Staleness::Never));
    assert!(ranked[1].is_overdue());
    assert!(!ranked[2].is_overdue());
    assert_eq!(ranked[2].display_name.as_deref(), Some("Ada Lovelace"));

    // Tracked but gone from the directory, and on no wave
    assert_eq!(ranked[3].display_name, None);
    assert_eq!(ranked[3].staleness, None);
}

#[test]
fn test_rank_from_cache_without_refresh() {
    let snapshot = sample_snapshot();
    let store = store_with(snapshot.clone());
    let weekly = store.create_or_get_wave("Weekly", days(7)).unwrap();
    store.add_contacts(&[DirectoryId(1), DirectoryId(2)]);
    store.assign_wave(DirectoryId(1), weekly.id()).unwrap();
    store.assign_wave(DirectoryId(2), weekly.id()).unwrap();

    let ranked = rank_contacts(&store, &snapshot, NOW, false).unwrap();
    assert!(ranked
        .iter()
        .all(|r| r.staleness == Some(Staleness::Never)));

    // A refresh caches the times; later rankings without refresh see them
    store.refresh_all().unwrap();
    let ranked = rank_contacts(&store, &snapshot, NOW, false).unwrap();
    assert_eq!(ranked[0].contact.directory_id(), DirectoryId(2));
    let ratio = ranked[0].staleness.and_then(|s| s.ratio()).unwrap();
    assert!((ratio - 40.0 / 7.0).abs() < 1e-9);
}

#[test]
fn test_rank_empty_store() {
    let store = store_with(SnapshotSources::default());
    let ranked = rank_contacts(&store, &SnapshotSources::default(), NOW, true).unwrap();
    assert!(ranked.is_empty());
}

#[test]
fn test_display_names_resolved_each_time() {
    let store = sample_store();
    store.create_contact(DirectoryId(2)).unwrap();

    let mut renamed = sample_snapshot();
    renamed.people[1].display_name = "Rear Admiral Hopper".to_string();

    let before = rank_contacts(&store, &sample_snapshot(), NOW, false).unwrap();
    let after = rank_contacts(&store, &renamed, NOW, false).unwrap();
    assert_eq!(before[0].display_name.as_deref(), Some("Grace Hopper"));
    assert_eq!(after[0].display_name.as_deref(), Some("Rear Admiral Hopper"));
}

#[test]
fn test_selection_round() {
    let snapshot = sample_snapshot();
    let store = store_with(snapshot.clone());

    let choices = selectable_contacts(&snapshot, &store, None).unwrap();
    let names: Vec<&str> = choices.iter().map(|c| c.display_name.as_str()).collect();
    assert_eq!(names, vec!["Ada Lovelace", "Grace Hopper"]);
    assert!(choices.iter().all(|c| !c.tracked));

    let outcome = apply_selection(&store, &[DirectoryId(1), DirectoryId(2)], &[]);
    assert!(outcome.is_clean());

    let outcome = apply_selection(&store, &[DirectoryId(1)], &[DirectoryId(2)]);
    assert!(outcome.is_clean());

    let choices = selectable_contacts(&snapshot, &store, None).unwrap();
    let tracked: Vec<bool> = choices.iter().map(|c| c.tracked).collect();
    assert_eq!(tracked, vec![true, false]);
}
