#![doc(test(attr(deny(warnings))))]

//! pursebook records income and expenses, summarizes them by category and
//! reminds the user, on a configurable cadence, to keep the record up to date.
//!
//! This crate hosts the command-line surface: argument parsing, terminal
//! notifications, the CSV statement reader and the reminder watch loop. The
//! business rules live in `pursebook-core`.

pub mod cli;
pub mod errors;
pub mod notify;
pub mod output;
pub mod runner;
pub mod statement;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing. `log_filter` is used when `RUST_LOG` is unset.
pub fn init(log_filter: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(log_filter);
        tracing::debug!("pursebook tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init(None);
        super::init(Some("debug"));
    }
}
