//! Log setup for `run-bild-translation`.
//!
//! The launcher's stdout carries the printed launch plan and then the
//! evaluation pipeline's own output, so launcher logs are routed to stderr.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the launcher's stderr subscriber.
///
/// `level` comes from `--verbose` and is overridden by `RUST_LOG`; `json`
/// switches to one JSON object per line. Only the first call installs a
/// subscriber.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}
