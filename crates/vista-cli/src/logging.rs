//! Log subscriber setup.
//!
//! Logs go to stderr. `RUST_LOG` takes precedence over the level derived
//! from `-v`/`-q`.

use crate::config::CliConfig;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
#[must_use]
pub fn default_filter(config: &CliConfig) -> EnvFilter {
    EnvFilter::new(config.verbosity.log_directive())
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if config.log_json {
        builder.json().try_init()
    } else {
        builder.with_ansi(config.color.should_color()).try_init()
    };
    if installed.is_err() {
        tracing::debug!("log subscriber already installed");
    }
}
