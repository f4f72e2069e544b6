//! Tracing subscriber installation
//!
//! ```no_run
//! use snowgate_domain::LogSettings;
//!
//! snowgate_infra::observability::init_tracing(&LogSettings::default()).ok();
//! tracing::info!("ready");
//! ```

use snowgate_domain::{LogFormat, LogSettings};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `settings.level`. Output is
/// human-readable or one JSON object per line.
///
/// # Errors
/// Fails when the level directive is invalid or a global subscriber is
/// already installed. Callers that may initialise twice can ignore the error.
pub fn init_tracing(settings: &LogSettings) -> anyhow::Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    match settings.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true).with_target(true))
            .try_init()?,
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().with_target(true)).try_init()?,
    }

    Ok(())
}
