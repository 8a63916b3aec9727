//! Call History Scanner
//!
//! Finds the most recent call that counts as real contact with a person. A
//! logged call that was missed, or that lasted only a few seconds, is not
//! evidence of a conversation, so both are filtered out before picking the
//! latest entry.

use std::sync::Arc;

use crate::error::CoreResult;
use crate::sources::{CallFilter, CallHistory, Timestamp};

/// Calls shorter than this many seconds don't count by default.
pub const DEFAULT_MIN_CALL_DURATION_SECS: i64 = 120;

/// Read-only scanner over the external call history.
#[derive(Clone)]
pub struct CallHistoryScanner {
    history: Arc<dyn CallHistory>,
}

impl CallHistoryScanner {
    pub fn new(history: Arc<dyn CallHistory>) -> Self {
        Self { history }
    }

    /// Timestamp of the latest qualifying call with any of `phone_numbers`,
    /// or `None` if there never was one.
    ///
    /// An empty candidate set returns `None` without touching the history.
    /// Errors from the history source are returned as-is; an unreadable log
    /// is not the same thing as "never called".
    pub fn most_recent_contact<I, S>(
        &self,
        phone_numbers: I,
        min_duration_secs: i64,
        exclude_missed: bool,
    ) -> CoreResult<Option<Timestamp>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filter = CallFilter::new(phone_numbers, min_duration_secs, exclude_missed);
        self.most_recent_matching(&filter)
    }

    /// Same as [`most_recent_contact`](Self::most_recent_contact) with a
    /// prebuilt filter.
    pub fn most_recent_matching(&self, filter: &CallFilter) -> CoreResult<Option<Timestamp>> {
        if filter.is_empty() {
            return Ok(None);
        }

        // Re-check the predicate: sources are free to over-approximate.
        let latest = self
            .history
            .matching(filter)?
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .map(|entry| entry.timestamp)
            .max();

        Ok(latest)
    }
}
