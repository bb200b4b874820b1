//! pursebook-domain
//!
//! Pure domain models (Transaction, categories, ReminderConfig).
//! No I/O, no CLI, no storage. Only data types, validation and core enums.

pub mod category;
pub mod common;
pub mod error;
pub mod reminder;
pub mod transaction;

pub use category::*;
pub use common::*;
pub use error::ValidationError;
pub use reminder::*;
pub use transaction::*;
