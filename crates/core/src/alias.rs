//! Alias Resolution
//!
//! A directory entry the user sees as one person may be backed by several raw
//! records (merged duplicates, one per account). Phone numbers live on the
//! raw records, so finding every number for a person means fanning out
//! `DirectoryId -> [RawAliasId] -> [PhoneRecord]`.
//!
//! Nothing is cached here. The directory can re-merge records at any time.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::sources::{DirectoryId, PhoneNumberStore, PhoneRecord, RawAliasId, RawIdentityDirectory};

/// Resolves a directory id to its raw aliases and their phone numbers.
#[derive(Clone)]
pub struct AliasResolver {
    identities: Arc<dyn RawIdentityDirectory>,
    phones: Arc<dyn PhoneNumberStore>,
}

impl AliasResolver {
    pub fn new(identities: Arc<dyn RawIdentityDirectory>, phones: Arc<dyn PhoneNumberStore>) -> Self {
        Self { identities, phones }
    }

    /// Every raw alias merged into `id`, duplicates removed.
    ///
    /// Unknown directory ids resolve to an empty list.
    pub fn resolve_aliases(&self, id: DirectoryId) -> CoreResult<Vec<RawAliasId>> {
        let mut seen = HashSet::new();
        let aliases = self
            .identities
            .raw_aliases(id)?
            .into_iter()
            .filter(|alias| seen.insert(*alias))
            .collect();
        Ok(aliases)
    }

    /// Raw phone number strings attached to a single alias.
    pub fn phone_numbers(&self, alias: RawAliasId) -> CoreResult<Vec<String>> {
        Ok(self
            .phones
            .phone_numbers(alias)?
            .into_iter()
            .map(|record| record.number)
            .collect())
    }

    /// Phone records across every alias of `id`, in alias order.
    pub fn phone_records(&self, id: DirectoryId) -> CoreResult<Vec<PhoneRecord>> {
        let mut records = Vec::new();
        for alias in self.resolve_aliases(id)? {
            records.extend(self.phones.phone_numbers(alias)?);
        }
        Ok(records)
    }

    /// Raw phone numbers across every alias of `id`.
    ///
    /// Exact duplicates are dropped, first occurrence wins.
    pub fn all_phone_numbers(&self, id: DirectoryId) -> CoreResult<Vec<String>> {
        let mut seen = HashSet::new();
        Ok(self
            .phone_records(id)?
            .into_iter()
            .map(|record| record.number)
            .filter(|number| seen.insert(number.clone()))
            .collect())
    }

    /// Number to dial for `id`: the first one flagged primary, otherwise the
    /// first one found.
    pub fn primary_phone_number(&self, id: DirectoryId) -> CoreResult<String> {
        let records = self.phone_records(id)?;
        let chosen = records
            .iter()
            .find(|record| record.is_primary)
            .or_else(|| records.first());

        match chosen {
            Some(record) => Ok(record.number.clone()),
            None => Err(CoreError::no_contact_info(format!(
                "No phone number available for directory id {}",
                id
            ))),
        }
    }
}
