//! Periodic "log your expenses" reminders: policy, shared settings and scheduler.

pub mod policy;
pub mod scheduler;
pub mod settings;

pub use policy::*;
pub use scheduler::*;
pub use settings::ReminderSettings;
