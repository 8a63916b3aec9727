//! Services
//!
//! Business logic services for the application.
//! Services handle the core functionality and are called by commands.

pub mod contact_store;
pub mod ranking;
pub mod selection;

pub use contact_store::{BatchOutcome, ContactWaveStore};
pub use ranking::{rank_contacts, RankedContact};
pub use selection::{apply_selection, selectable_contacts, SelectableContact, SelectionOutcome};
