//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Build the env filter: RUST_LOG if set, otherwise the configured level
/// for this crate.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("flow_breaker={}", config.log_level)))
}

/// Install the global tracing subscriber.
///
/// Returns false if a subscriber was already installed.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .is_ok()
}
