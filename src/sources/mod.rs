//! External Sources
//!
//! Wiring for the collaborators Heatwave reads but does not own: the contact
//! directory, the raw identity records behind each entry, their phone numbers,
//! and the call history. The traits live in `heatwave_core::sources`; this
//! module bundles concrete implementations for injection into the store.

pub mod snapshot;

use std::sync::Arc;

use heatwave_core::{
    AliasResolver, CallHistory, CallHistoryScanner, ContactDirectory, PhoneNumberStore,
    RawIdentityDirectory,
};

pub use snapshot::{SnapshotAlias, SnapshotPerson, SnapshotSources};

/// The four external sources, shared behind `Arc`s.
#[derive(Clone)]
pub struct ExternalSources {
    pub directory: Arc<dyn ContactDirectory>,
    pub identities: Arc<dyn RawIdentityDirectory>,
    pub phones: Arc<dyn PhoneNumberStore>,
    pub history: Arc<dyn CallHistory>,
}

impl ExternalSources {
    /// Back every source with the same snapshot
    pub fn from_snapshot(snapshot: SnapshotSources) -> Self {
        let shared = Arc::new(snapshot);
        Self {
            directory: shared.clone(),
            identities: shared.clone(),
            phones: shared.clone(),
            history: shared,
        }
    }

    pub fn alias_resolver(&self) -> AliasResolver {
        AliasResolver::new(self.identities.clone(), self.phones.clone())
    }

    pub fn scanner(&self) -> CallHistoryScanner {
        CallHistoryScanner::new(self.history.clone())
    }
}
