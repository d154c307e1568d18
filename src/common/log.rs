use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_tree::HierarchicalLayer;

pub const LOG_ENV_VAR: &str = "SHEET_LOG";

/// Installs the global subscriber. Only binaries call this; the library just emits events.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let tree = HierarchicalLayer::new(2)
        .with_targets(true)
        .with_bracketed_fields(true)
        .with_writer(std::io::stderr);
    let _ = tracing_subscriber::registry().with(filter).with(tree).try_init();
}
