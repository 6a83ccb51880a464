//! Subscriber setup for the CLI.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FORMAT_ENV: &str = "BUILDKITE_LOG_FORMAT";

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects
/// `buildkite_client=trace` (full payloads), else `warn`.
/// `BUILDKITE_LOG_FORMAT=json` switches to JSON lines. Logs go to stderr so
/// stdout stays parseable.
pub fn init(verbose: bool) -> Result<()> {
    let default_directive = if verbose {
        "warn,buildkite_client=trace"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))?;

    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string());

    match log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()?,
    }

    Ok(())
}
