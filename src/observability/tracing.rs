use tracing::Span;
use tracing_subscriber::EnvFilter;
use crate::config::LoggingConfig;
use crate::error::{Error, Result};
use crate::source::QueryWindow;
use crate::types::market::{BiddingZone, MarketSlot};

pub fn trace_slot_refresh(slot: &MarketSlot) -> Span {
    tracing::info_span!(
        "slot_refresh",
        slot = %slot,
    )
}

pub fn trace_upstream_fetch(zone: BiddingZone, window: &QueryWindow) -> Span {
    tracing::debug_span!(
        "upstream_fetch",
        zone = %zone,
        resolution = %window.resolution,
        start = %window.start,
    )
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::ConfigError(format!("invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| Error::ConfigError(format!("failed to install tracing subscriber: {}", e)))
}
