pub mod build_info;
pub mod paths;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Default directives when neither `RUST_LOG` nor the config sets a filter.
pub const DEFAULT_LOG_FILTER: &str = "warn,pursebook=info,pursebook_core=info";

/// Initializes the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `configured`; both fall back to [`DEFAULT_LOG_FILTER`].
pub fn init_tracing(configured: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_LOG_FILTER)))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
