//! Structured logging setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Installs a compact stderr subscriber.
///
/// `RUST_LOG` wins over `default_level`; an unparsable level falls back to
/// `warn`. Later calls are no-ops, so tests and embedders may call it freely.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_filter(filter);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
