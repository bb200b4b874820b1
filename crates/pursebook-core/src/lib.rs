//! pursebook-core
//!
//! Business logic for pursebook: the transaction store, the reminder policy and
//! scheduler, statement import and the persistence adapter.
//! Depends on pursebook-domain. No CLI, no terminal I/O, no direct file access.

pub mod error;
pub mod format;
pub mod import;
pub mod notify;
pub mod persistence;
pub mod reminders;
pub mod store;
pub mod time;
pub mod tracker;


pub use error::CoreError;
pub use format::*;
pub use import::*;
pub use notify::*;
pub use persistence::*;
pub use reminders::*;
pub use store::*;
pub use time::*;
pub use tracker::*;
