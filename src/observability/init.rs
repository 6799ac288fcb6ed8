//! Tracing initialization and subscriber setup.

use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directive used when neither `RUST_LOG` nor the config names one.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Picks the filter directive: environment first, then config, then default.
///
/// Blank values count as unset.
///
/// # Example
///
/// ```rust
/// use eventdesk::observability::resolve_directive;
///
/// assert_eq!(resolve_directive(Some("warn".into()), Some("debug")), "warn");
/// assert_eq!(resolve_directive(None, Some("eventdesk=debug")), "eventdesk=debug");
/// assert_eq!(resolve_directive(Some(" ".into()), None), "info");
/// ```
#[must_use]
pub fn resolve_directive(env: Option<String>, configured: Option<&str>) -> String {
    env.filter(|value| !value.trim().is_empty())
        .or_else(|| {
            configured
                .filter(|value| !value.trim().is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

/// Installs the global subscriber.
///
/// Idempotent: only the first call in a process takes effect, later calls
/// (and calls after another subscriber was installed) are ignored. An
/// unparsable directive falls back to [`DEFAULT_DIRECTIVE`].
pub fn init_tracing(config: &Config) {
    let directive = resolve_directive(
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        config.trace_level.as_deref(),
    );

    let filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr));

    if subscriber.try_init().is_ok() {
        tracing::debug!(directive = %directive, "tracing initialized");
    }
}
