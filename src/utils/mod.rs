pub mod build_info;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVES: &[&str] = &[
    "expense_core=info",
    "tally_core=warn",
    "tally_storage_json=warn",
];

/// Initializes the global tracing subscriber. Logs go to stderr so script output stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = DEFAULT_DIRECTIVES
            .iter()
            .filter_map(|directive| directive.parse().ok())
            .fold(EnvFilter::from_default_env(), EnvFilter::add_directive);

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
