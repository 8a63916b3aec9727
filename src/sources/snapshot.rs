//! Snapshot Sources
//!
//! A JSON file standing in for the external directory and call log. Used by
//! the command line front end and the test suite.
//!
//! ```json
//! {
//!   "people": [
//!     { "id": 1, "display_name": "Ada Lovelace",
//!       "aliases": [ { "id": 10, "phones": [ { "number": "(555) 123-4567", "is_primary": true } ] },
//!                    { "id": 11 } ] }
//!   ],
//!   "calls": [
//!     { "number": "5551234567", "timestamp": 1700000000, "duration_secs": 300, "call_type": "outgoing" }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use heatwave_core::{
    CallEntry, CallFilter, CallHistory, ContactDirectory, CoreResult, DirectoryEntry, DirectoryId,
    PhoneNumberStore, PhoneRecord, RawAliasId, RawIdentityDirectory,
};
use serde::{Deserialize, Serialize};

use crate::utils::error::AppResult;

/// One raw record merged into a person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotAlias {
    pub id: RawAliasId,
    #[serde(default)]
    pub phones: Vec<PhoneRecord>,
}

/// One directory entry with its raw records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotPerson {
    pub id: DirectoryId,
    pub display_name: String,
    #[serde(default)]
    pub aliases: Vec<SnapshotAlias>,
}

impl SnapshotPerson {
    fn has_phone_number(&self) -> bool {
        self.aliases.iter().any(|alias| !alias.phones.is_empty())
    }

    fn entry(&self) -> DirectoryEntry {
        DirectoryEntry {
            id: self.id,
            display_name: self.display_name.clone(),
            has_phone_number: self.has_phone_number(),
        }
    }
}

/// In-memory directory, alias, phone and call data loaded from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotSources {
    #[serde(default)]
    pub people: Vec<SnapshotPerson>,
    #[serde(default)]
    pub calls: Vec<CallEntry>,
}

impl SnapshotSources {
    /// Load a snapshot from a JSON file
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        let snapshot: SnapshotSources = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            people = snapshot.people.len(),
            calls = snapshot.calls.len(),
            "loaded source snapshot"
        );
        Ok(snapshot)
    }

    /// Write the snapshot as pretty JSON
    pub fn save(&self, path: &Path) -> AppResult<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn person(&self, id: DirectoryId) -> Option<&SnapshotPerson> {
        self.people.iter().find(|p| p.id == id)
    }

    fn alias_index(&self) -> HashMap<RawAliasId, &SnapshotAlias> {
        self.people
            .iter()
            .flat_map(|p| p.aliases.iter())
            .map(|alias| (alias.id, alias))
            .collect()
    }
}

impl ContactDirectory for SnapshotSources {
    fn entry(&self, id: DirectoryId) -> CoreResult<Option<DirectoryEntry>> {
        Ok(self.person(id).map(SnapshotPerson::entry))
    }

    fn search(&self, name_prefix: Option<&str>) -> CoreResult<Vec<DirectoryEntry>> {
        let prefix = name_prefix.map(str::to_lowercase);
        Ok(self
            .people
            .iter()
            .filter(|p| match &prefix {
                Some(prefix) => p.display_name.to_lowercase().starts_with(prefix.as_str()),
                None => true,
            })
            .map(SnapshotPerson::entry)
            .collect())
    }
}

impl RawIdentityDirectory for SnapshotSources {
    fn raw_aliases(&self, id: DirectoryId) -> CoreResult<Vec<RawAliasId>> {
        Ok(self
            .person(id)
            .map(|p| p.aliases.iter().map(|alias| alias.id).collect())
            .unwrap_or_default())
    }
}

impl PhoneNumberStore for SnapshotSources {
    fn phone_numbers(&self, alias: RawAliasId) -> CoreResult<Vec<PhoneRecord>> {
        Ok(self
            .alias_index()
            .get(&alias)
            .map(|alias| alias.phones.clone())
            .unwrap_or_default())
    }
}

impl CallHistory for SnapshotSources {
    fn matching(&self, filter: &CallFilter) -> CoreResult<Vec<CallEntry>> {
        Ok(self
            .calls
            .iter()
            .filter(|call| filter.matches(call))
            .cloned()
            .collect())
    }
}
