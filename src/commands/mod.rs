//! Commands
//!
//! Entry points used by the command line front end. Each returns a
//! [`CommandResponse`](crate::models::response::CommandResponse) so errors
//! reach the user as data instead of aborting the process.

pub mod contacts;
pub mod health;
pub mod settings;
pub mod waves;

pub use contacts::*;
pub use health::*;
pub use settings::*;
pub use waves::*;
