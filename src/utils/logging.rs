//! Logging setup
//!
//! One fmt subscriber for the process. `RUST_LOG` overrides the default
//! filter.

use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_FILTER: &str = "ssp_dataprep=info";

/// Install the global subscriber. Returns false if one was already set.
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .try_init()
        .is_ok()
}
