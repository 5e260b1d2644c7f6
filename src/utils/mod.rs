pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the config supplies one.
pub const DEFAULT_LOG_FILTER: &str = "finance_tracker=info,fintrack_core=info";

static TRACING_INIT: Once = Once::new();

/// Installs the global `fmt` subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `fallback`, which in turn overrides
/// [`DEFAULT_LOG_FILTER`]. Only the first call has any effect.
pub fn init_tracing(fallback: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(fallback.unwrap_or(DEFAULT_LOG_FILTER)))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
