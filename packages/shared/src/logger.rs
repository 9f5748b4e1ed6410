//! Logging setup utilities for the Hiroba relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the library crate of the calling binary as well as the
/// binary itself. `RUST_LOG` overrides it entirely when set.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "hiroba-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use hiroba_shared::logger::setup_logger;
///
/// setup_logger("hiroba-server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    let crate_name = binary_name.replace('-', "_");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}={},{}={},tower_http={}",
                    crate_name,
                    default_log_level,
                    env!("CARGO_PKG_NAME").replace('-', "_"),
                    default_log_level,
                    default_log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
