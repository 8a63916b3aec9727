//! Selection
//!
//! Browsing the directory for contacts worth tracking, and applying a batch of
//! track/untrack choices.

use std::collections::HashSet;

use heatwave_core::{ContactDirectory, DirectoryId};
use serde::{Deserialize, Serialize};

use crate::services::contact_store::{BatchOutcome, ContactWaveStore};
use crate::utils::error::AppResult;

/// A directory entry that can be tracked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectableContact {
    pub directory_id: DirectoryId,
    pub display_name: String,
    pub tracked: bool,
}

/// Result of applying a selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionOutcome {
    pub added: BatchOutcome,
    pub removed: BatchOutcome,
}

impl SelectionOutcome {
    pub fn is_clean(&self) -> bool {
        self.added.is_clean() && self.removed.is_clean()
    }
}

/// Directory entries with a phone number, sorted by name, each flagged if it
/// is already tracked. `name_prefix` narrows the search.
pub fn selectable_contacts(
    directory: &dyn ContactDirectory,
    store: &ContactWaveStore,
    name_prefix: Option<&str>,
) -> AppResult<Vec<SelectableContact>> {
    let tracked: HashSet<DirectoryId> = store.tracked_directory_ids()?.into_iter().collect();

    let mut selectable: Vec<SelectableContact> = directory
        .search(name_prefix)?
        .into_iter()
        .filter(|entry| entry.has_phone_number)
        .map(|entry| SelectableContact {
            tracked: tracked.contains(&entry.id),
            directory_id: entry.id,
            display_name: entry.display_name,
        })
        .collect();

    selectable.sort_by_cached_key(|c| c.display_name.to_lowercase());
    Ok(selectable)
}

/// Track every id in `actives` and untrack every id in `inactives`.
///
/// Items are applied one by one; a failure is recorded and the rest continue.
pub fn apply_selection(
    store: &ContactWaveStore,
    actives: &[DirectoryId],
    inactives: &[DirectoryId],
) -> SelectionOutcome {
    let outcome = SelectionOutcome {
        added: store.add_contacts(actives),
        removed: store.remove_contacts(inactives),
    };
    tracing::info!(
        added = outcome.added.succeeded.len(),
        removed = outcome.removed.succeeded.len(),
        failed = outcome.added.failed.len() + outcome.removed.failed.len(),
        "applied selection"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::ScanSettings;
    use crate::sources::{ExternalSources, SnapshotAlias, SnapshotPerson, SnapshotSources};
    use crate::storage::database::Database;
    use heatwave_core::{PhoneRecord, RawAliasId};

    fn person(id: i64, name: &str, phone: Option<&str>) -> SnapshotPerson {
        SnapshotPerson {
            id: DirectoryId(id),
            display_name: name.to_string(),
            aliases: vec![SnapshotAlias {
                id: RawAliasId(id),
                phones: phone.into_iter().map(PhoneRecord::new).collect(),
            }],
        }
    }

    fn setup() -> (ContactWaveStore, SnapshotSources) {
        let snapshot = SnapshotSources {
            people: vec![
                person(1, "zoe", Some("555-0001")),
                person(2, "Adam", Some("555-0002")),
                person(3, "Bea", None),
                person(4, "ben", Some("555-0004")),
            ],
            calls: vec![],
        };
        let db = Database::new_in_memory().unwrap();
        let store = ContactWaveStore::from_database(
            &db,
            ExternalSources::from_snapshot(snapshot.clone()),
            ScanSettings::default(),
        );
        (store, snapshot)
    }

    #[test]
    fn test_selectable_filters_and_sorts() {
        let (store, snapshot) = setup();
        store.create_contact(DirectoryId(4)).unwrap();

        let list = selectable_contacts(&snapshot, &store, None).unwrap();
        let names: Vec<&str> = list.iter().map(|c| c.display_name.as_str()).collect();
        assert_eq!(names, vec!["Adam", "ben", "zoe"]);
        assert!(list[1].tracked);
        assert!(!list[0].tracked);
    }

    #[test]
    fn test_selectable_prefix() {
        let (store, snapshot) = setup();
        let list = selectable_contacts(&snapshot, &store, Some("b")).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].directory_id, DirectoryId(4));
    }

    #[test]
    fn test_apply_selection() {
        let (store, _) = setup();
        store.create_contact(DirectoryId(2)).unwrap();

        let outcome = apply_selection(
            &store,
            &[DirectoryId(1), DirectoryId(4)],
            &[DirectoryId(2), DirectoryId(3)],
        );
        assert!(outcome.is_clean());

        let mut tracked = store.tracked_directory_ids().unwrap();
        tracked.sort();
        assert_eq!(tracked, vec![DirectoryId(1), DirectoryId(4)]);
    }
}
