//! Process-wide logging setup.
//!
//! Exactly one subscriber is installed, at startup, before any command
//! runs. The filter comes from `RUST_LOG` when set, otherwise from the
//! given level. Output goes to stderr so stdout stays machine-readable.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

pub fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level {:?}", level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install log subscriber")
}
