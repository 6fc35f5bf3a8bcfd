use axum::{
    Router,
    routing::get,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use crate::api::response::{json_response, ApiError};
use crate::cache::slot_cache::SlotCache;
use crate::error::{Error, Result};
use crate::forecast::Coordinates;
use crate::forecast::open_meteo::OpenMeteoClient;
use crate::observability::metrics;
use crate::types::market::MarketSlot;

pub struct ApiState {
    // Written only by the refresh scheduler
    pub cache: Arc<SlotCache>,
    pub forecast: OpenMeteoClient,
}

pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/v1/day_ahead_prices/:country/:resolution", get(day_ahead_prices))
        .route("/v1/temperatures/:lat/:lon", get(temperatures))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> &'static str {
    "Day-ahead electricity prices for DE, LU and AT, and hourly temperature forecasts.\n"
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics_handler() -> String {
    metrics::render()
}

async fn day_ahead_prices(
    State(state): State<Arc<ApiState>>,
    Path((country, resolution)): Path<(String, String)>,
) -> std::result::Result<Response, ApiError> {
    let body = cached_prices(&state.cache, &country, &resolution).map_err(|e| {
        if !matches!(e, Error::NotYetAvailable) {
            info!("Rejected price request {}/{}: {}", country, resolution, e);
        }
        ApiError::from(e)
    })?;
    Ok(json_response(StatusCode::OK, body))
}

/// Validation happens before the cache is consulted.
fn cached_prices(cache: &SlotCache, country: &str, resolution: &str) -> Result<String> {
    let slot = MarketSlot::lookup(country, resolution)?;
    match cache.get(&slot) {
        Some(payload) if payload.is_found() => Ok(payload.body().to_string()),
        _ => Err(Error::NotYetAvailable),
    }
}

async fn temperatures(
    State(state): State<Arc<ApiState>>,
    Path((lat, lon)): Path<(String, String)>,
) -> std::result::Result<Response, ApiError> {
    let coords = Coordinates::parse(&lat, &lon)?;
    let body = state.forecast.fetch(coords).await?.to_json()?;
    Ok(json_response(StatusCode::OK, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::payload::CachedPayload;
    use crate::types::market::{BiddingZone, Resolution};

    #[test]
    fn serves_cached_body_verbatim() {
        let cache = SlotCache::new();
        let payload = CachedPayload::new(1_700_000_000, vec![1000, -25], 1_700_100_000).unwrap();
        let expected = payload.body().to_string();
        cache.put(MarketSlot::new(BiddingZone::DeLu, Resolution::Min60), payload);

        assert_eq!(cached_prices(&cache, "de", "60min").unwrap(), expected);
        assert_eq!(cached_prices(&cache, "LU", "60MIN").unwrap(), expected);
    }

    #[test]
    fn validation_precedes_lookup() {
        let cache = SlotCache::new();
        assert!(matches!(cached_prices(&cache, "fr", "30min"), Err(Error::UnsupportedCountry(_))));
        assert!(matches!(cached_prices(&cache, "at", "30min"), Err(Error::UnsupportedResolution(_))));
        assert!(matches!(cached_prices(&cache, "at", "15min"), Err(Error::NotYetAvailable)));
    }

    #[test]
    fn not_found_marker_is_not_served() {
        let cache = SlotCache::new();
        cache.put(MarketSlot::new(BiddingZone::At, Resolution::Min15), CachedPayload::not_found());
        assert!(matches!(cached_prices(&cache, "at", "15min"), Err(Error::NotYetAvailable)));
    }
}
