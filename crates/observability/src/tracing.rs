//! Tracing/logging initialization.
//!
//! JSON lines with timestamps on stdout. Filtering follows `RUST_LOG`, e.g.
//! `RUST_LOG=stocksync_infra::sync=debug` to watch every inventory call.

use tracing_subscriber::EnvFilter;

/// Fallback directives when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Like [`init`], falling back to `default_directives` instead of `info`.
pub fn init_with_filter(default_directives: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directives))
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true)
        .try_init();
}

fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_a_no_op() {
        init();
        init_with_filter("debug");
        init();
        tracing::info!("still logging after repeated init");
    }

    #[test]
    fn malformed_directives_fall_back_to_default() {
        // Only meaningful when RUST_LOG is not set by the test environment.
        if std::env::var_os("RUST_LOG").is_none() {
            let filter = env_filter("stocksync=loudest");
            assert_eq!(filter.max_level_hint(), Some(tracing::level_filters::LevelFilter::INFO));
        }
    }
}
