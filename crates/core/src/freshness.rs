//! Freshness Scoring
//!
//! Turns "when did we last talk" plus a wave's target interval into a
//! dimensionless staleness ratio. A ratio below 1.0 means the contact is still
//! within its wave; 1.0 or more means overdue. A contact that was never reached
//! ranks above every finite ratio.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::sources::Timestamp;

/// Wavelengths are entered in days and stored in seconds.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// A wave's target re-contact interval in seconds. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Wavelength(i64);

impl Wavelength {
    /// Validate a wavelength in seconds.
    pub fn from_secs(secs: i64) -> CoreResult<Self> {
        if secs <= 0 {
            return Err(CoreError::invalid_interval(format!(
                "wavelength must be a positive number of seconds, got {}",
                secs
            )));
        }
        Ok(Self(secs))
    }

    /// Validate a wavelength given in days.
    pub fn from_days(days: i64) -> CoreResult<Self> {
        let secs = days.checked_mul(SECONDS_PER_DAY).ok_or_else(|| {
            CoreError::invalid_interval(format!("wavelength of {} days overflows", days))
        })?;
        Self::from_secs(secs)
    }

    pub fn as_secs(&self) -> i64 {
        self.0
    }

    /// Whole days, rounded down.
    pub fn as_days(&self) -> i64 {
        self.0 / SECONDS_PER_DAY
    }
}

impl TryFrom<i64> for Wavelength {
    type Error = CoreError;

    fn try_from(secs: i64) -> CoreResult<Self> {
        Self::from_secs(secs)
    }
}

impl<'de> Deserialize<'de> for Wavelength {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let secs = i64::deserialize(deserializer)?;
        Wavelength::from_secs(secs).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Wavelength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % SECONDS_PER_DAY == 0 {
            write!(f, "{}d", self.as_days())
        } else {
            write!(f, "{}s", self.0)
        }
    }
}

/// How overdue a contact is relative to its wave.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ratio", rename_all = "snake_case")]
pub enum Staleness {
    /// Elapsed time divided by the wavelength
    Ratio(f64),
    /// No qualifying contact on record; outranks every ratio
    Never,
}

impl Staleness {
    /// Ratio value, `None` for [`Staleness::Never`].
    pub fn ratio(&self) -> Option<f64> {
        match self {
            Staleness::Ratio(r) => Some(*r),
            Staleness::Never => None,
        }
    }

    /// At or past the target interval.
    pub fn is_overdue(&self) -> bool {
        match self {
            Staleness::Ratio(r) => *r >= 1.0,
            Staleness::Never => true,
        }
    }
}

impl PartialEq for Staleness {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Staleness {}

impl PartialOrd for Staleness {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Staleness {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Staleness::Never, Staleness::Never) => Ordering::Equal,
            (Staleness::Never, Staleness::Ratio(_)) => Ordering::Greater,
            (Staleness::Ratio(_), Staleness::Never) => Ordering::Less,
            (Staleness::Ratio(a), Staleness::Ratio(b)) => a.total_cmp(b),
        }
    }
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Staleness::Ratio(r) => write!(f, "{:.2}", r),
            Staleness::Never => write!(f, "never"),
        }
    }
}

/// Staleness of a contact last reached at `last_contact`, measured at `now`.
pub fn score(last_contact: Option<Timestamp>, wavelength: Wavelength, now: Timestamp) -> Staleness {
    match last_contact {
        None => Staleness::Never,
        Some(last) => {
            let elapsed = now.saturating_sub(last) as f64;
            Staleness::Ratio(elapsed / wavelength.as_secs() as f64)
        }
    }
}

/// Comparator for `sort_by` that puts the most overdue first.
///
/// Equal scores compare equal; callers must not rely on their relative order.
pub fn compare_most_overdue_first(a: &Staleness, b: &Staleness) -> Ordering {
    b.cmp(a)
}
