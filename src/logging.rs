//! Diagnostic logging for the CLI.
//!
//! Logs go to stderr so stdout stays machine-readable. Filtering follows the
//! `READON_LOG` env var (`READON_LOG=debug`, `READON_LOG=readon::storage=debug`)
//! and defaults to `warn`. Set `READON_LOG_FORMAT=json` for one JSON object
//! per event.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "READON_LOG";

/// Environment variable selecting the log format (`text` or `json`).
pub const LOG_FORMAT_ENV: &str = "READON_LOG_FORMAT";

/// Install the global subscriber. A second call keeps the first one.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_ansi(false),
            )
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Warning: Could not initialize logging: {}", e);
    }
}
