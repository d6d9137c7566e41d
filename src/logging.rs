use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

static TRACING_INIT: Once = Once::new();

pub const DEFAULT_DIRECTIVE: &str = "finance_dashboard=info";

/// Installs the global subscriber. `RUST_LOG` wins when set; otherwise
/// `directive` (or the crate default) applies. Later calls are no-ops.
pub fn init_tracing(directive: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let fallback = directive.unwrap_or(DEFAULT_DIRECTIVE);
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(fallback))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        fmt().with_env_filter(filter).with_target(false).init();
        tracing::debug!(directive = fallback, "tracing initialized");
    });
}
