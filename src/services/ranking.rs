//! Ranking
//!
//! Orders tracked contacts by staleness, most overdue first.

use std::cmp::Ordering;

use heatwave_core::{compare_most_overdue_first, ContactDirectory, Staleness, Timestamp};
use serde::{Deserialize, Serialize};

use crate::models::contact::{Contact, ContactFields};
use crate::services::contact_store::ContactWaveStore;
use crate::utils::error::AppResult;

/// A tracked contact with its score and freshly resolved display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedContact {
    pub contact: Contact,
    /// `None` when the directory entry no longer exists
    pub display_name: Option<String>,
    /// `None` when the contact has no wave
    pub staleness: Option<Staleness>,
}

impl RankedContact {
    pub fn is_overdue(&self) -> bool {
        self.staleness.is_some_and(|s| s.is_overdue())
    }
}

/// Scored contacts first by descending staleness, unassigned contacts last
fn compare_ranked(a: &RankedContact, b: &RankedContact) -> Ordering {
    match (&a.staleness, &b.staleness) {
        (Some(a), Some(b)) => compare_most_overdue_first(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Rank every tracked contact at time `now`.
///
/// With `refresh` set, each last contact time is re-scanned from the call
/// history first (blocking) and a source failure aborts the ranking.
/// Otherwise the cached times are used.
pub fn rank_contacts(
    store: &ContactWaveStore,
    directory: &dyn ContactDirectory,
    now: Timestamp,
    refresh: bool,
) -> AppResult<Vec<RankedContact>> {
    let contacts = store.list_tracked()?;
    let mut ranked = Vec::with_capacity(contacts.len());

    for mut contact in contacts {
        if refresh {
            let last_contact = store.refresh_last_contact(&contact)?;
            contact.apply(ContactFields::new().last_contact(last_contact));
        }

        let display_name = directory
            .entry(contact.directory_id())?
            .map(|entry| entry.display_name);
        if display_name.is_none() {
            tracing::debug!(directory_id = %contact.directory_id(), "directory entry missing");
        }

        ranked.push(RankedContact {
            staleness: contact.staleness(now),
            display_name,
            contact,
        });
    }

    ranked.sort_by(compare_ranked);
    tracing::debug!(count = ranked.len(), refresh, "ranked contacts");
    Ok(ranked)
}
