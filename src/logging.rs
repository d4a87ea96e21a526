use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Build the event filter: `RUST_LOG` when set, `default_level` otherwise.
pub fn env_filter(default_level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level)
            .with_context(|| format!("invalid log level `{}`", default_level)),
    }
}

/// Install the global subscriber. Events go to stderr so stdout stays clean
/// for results.
pub fn init(default_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level)?)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("failed to install tracing subscriber")
}
