//! Subscriber setup. Logs go to stderr so stdout stays machine-readable.

use folio_core::config::GeneralConfig;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level; `verbose` wins over both.
pub fn init(general: &GeneralConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&general.log_level))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if general.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}
