//! Tracing and logging (shared setup).

/// Initialize process-wide logging, filtered by `RUST_LOG` (default `info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize process-wide logging with an explicit fallback filter.
///
/// `RUST_LOG` still wins when set.
pub fn init_with_filter(default_directives: &str) {
    tracing::init_with_filter(default_directives);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
