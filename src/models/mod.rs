//! Data Models
//!
//! Waves, tracked contacts and their partial-update payloads, settings, and
//! command responses.

pub mod contact;
pub mod response;
pub mod settings;
pub mod wave;

pub use contact::*;
pub use response::*;
pub use settings::*;
pub use wave::*;
