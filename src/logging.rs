use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when RUST_LOG is not set
const DEFAULT_DIRECTIVE: &str = "price_catalog=info";

/// Initializes console logging on stderr, keeping stdout for the search session.
///
/// `RUST_LOG` takes precedence; `verbose` lowers the crate's level to debug.
pub fn init_logging(verbose: bool) {
    let directive = if verbose {
        "price_catalog=debug"
    } else {
        DEFAULT_DIRECTIVE
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
