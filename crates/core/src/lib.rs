//! Heatwave Core
//!
//! The freshness resolution engine for the Heatwave workspace. Everything in
//! this crate is storage-agnostic: it talks to the outside world only through
//! the source traits in [`sources`], so the root crate (SQLite, CLI, snapshot
//! files) and the tests can plug in whatever backs them.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `identity` - Phone number normalization used for matching
//! - `sources` - Identifiers and the external directory / history traits
//! - `alias` - Directory id -> raw aliases -> phone numbers fan-out
//! - `scanner` - Most recent qualifying call lookup
//! - `freshness` - Wavelengths, staleness scores and their ordering
//!
//! ## Design Principles
//!
//! 1. **No storage dependencies** - only serde and thiserror
//! 2. **Trait-based sources** - every external collaborator is a trait object
//! 3. **Stateless engine** - nothing here caches; callers own persistence

pub mod alias;
pub mod error;
pub mod freshness;
pub mod identity;
pub mod scanner;
pub mod sources;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Identity ───────────────────────────────────────────────────────────
pub use identity::normalize;

// ── Sources ────────────────────────────────────────────────────────────
pub use sources::{
    CallEntry, CallFilter, CallHistory, CallType, ContactDirectory, ContactId, DirectoryEntry,
    DirectoryId, PhoneNumberStore, PhoneRecord, RawAliasId, RawIdentityDirectory, Timestamp,
    WaveId,
};

// ── Engine ─────────────────────────────────────────────────────────────
pub use alias::AliasResolver;
pub use freshness::{
    compare_most_overdue_first, score, Staleness, Wavelength, SECONDS_PER_DAY,
};
pub use scanner::{CallHistoryScanner, DEFAULT_MIN_CALL_DURATION_SECS};
