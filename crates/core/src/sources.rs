//! External Sources
//!
//! Identifiers shared across the workspace and the traits through which the
//! engine reads the external contact directory, the raw identity records
//! merged into each directory entry, their phone numbers, and the call
//! history. None of these sources are owned by Heatwave; every read may fail
//! with [`CoreError::SourceUnavailable`](crate::CoreError::SourceUnavailable).

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::identity::normalize;

/// Unix epoch seconds.
pub type Timestamp = i64;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// Stable identifier of a person in the external contact directory.
    DirectoryId
);
id_type!(
    /// Identifier of one underlying record merged into a directory entry.
    RawAliasId
);
id_type!(
    /// Local store id of a wave.
    WaveId
);
id_type!(
    /// Local store id of a tracked contact.
    ContactId
);

// ============================================================================
// Directory
// ============================================================================

/// One person as the external directory presents them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub id: DirectoryId,
    pub display_name: String,
    #[serde(default)]
    pub has_phone_number: bool,
}

/// The external contact directory.
pub trait ContactDirectory: Send + Sync {
    /// Look up a single entry. Unknown ids yield `Ok(None)`.
    fn entry(&self, id: DirectoryId) -> CoreResult<Option<DirectoryEntry>>;

    /// Entries whose display name starts with `name_prefix`
    /// (case-insensitive), or every entry when no prefix is given.
    fn search(&self, name_prefix: Option<&str>) -> CoreResult<Vec<DirectoryEntry>>;
}

/// Maps a directory entry to the raw records that were merged into it.
pub trait RawIdentityDirectory: Send + Sync {
    /// Unknown directory ids yield an empty list.
    fn raw_aliases(&self, id: DirectoryId) -> CoreResult<Vec<RawAliasId>>;
}

/// A phone number attached to a raw record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneRecord {
    pub number: String,
    #[serde(default)]
    pub is_primary: bool,
}

impl PhoneRecord {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            is_primary: false,
        }
    }

    pub fn primary(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            is_primary: true,
        }
    }
}

/// Phone numbers per raw record.
pub trait PhoneNumberStore: Send + Sync {
    /// Name-only records yield an empty list.
    fn phone_numbers(&self, alias: RawAliasId) -> CoreResult<Vec<PhoneRecord>>;
}

// ============================================================================
// Call history
// ============================================================================

/// Direction/outcome of a logged call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    Incoming,
    Outgoing,
    Missed,
}

impl CallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::Incoming => "incoming",
            CallType::Outgoing => "outgoing",
            CallType::Missed => "missed",
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of the append-only call log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEntry {
    pub number: String,
    pub timestamp: Timestamp,
    pub duration_secs: i64,
    pub call_type: CallType,
}

/// Predicate a call log entry must satisfy to count as contact.
///
/// Holds the candidate numbers already normalized; entry numbers are
/// normalized on comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFilter {
    numbers: HashSet<String>,
    min_duration_secs: i64,
    exclude_missed: bool,
}

impl CallFilter {
    /// Build a filter from raw candidate numbers.
    pub fn new<I, S>(numbers: I, min_duration_secs: i64, exclude_missed: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let numbers = numbers
            .into_iter()
            .map(|n| normalize(n.as_ref()))
            .filter(|n| !n.is_empty())
            .collect();
        Self {
            numbers,
            min_duration_secs,
            exclude_missed,
        }
    }

    /// Normalized candidate numbers
    pub fn numbers(&self) -> &HashSet<String> {
        &self.numbers
    }

    pub fn min_duration_secs(&self) -> i64 {
        self.min_duration_secs
    }

    pub fn exclude_missed(&self) -> bool {
        self.exclude_missed
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Whether `entry` is a qualifying call for one of the candidate numbers.
    pub fn matches(&self, entry: &CallEntry) -> bool {
        if entry.duration_secs < self.min_duration_secs {
            return false;
        }
        if self.exclude_missed && entry.call_type == CallType::Missed {
            return false;
        }
        self.numbers.contains(&normalize(&entry.number))
    }
}

/// The external call log.
pub trait CallHistory: Send + Sync {
    /// Every entry satisfying `filter`, in any order.
    fn matching(&self, filter: &CallFilter) -> CoreResult<Vec<CallEntry>>;
}
