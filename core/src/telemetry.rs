// templar/src/telemetry.rs

use crate::config::AppConfig;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber. `RUST_LOG` overrides the configured filter.
/// Does nothing if a global subscriber is already set.
pub fn init_tracing(config: &AppConfig) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

  let installed = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE)
    .try_init()
    .is_ok();

  if installed {
    tracing::debug!(filter = %config.log_filter, "Tracing initialized.");
  }
}
