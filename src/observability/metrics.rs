use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry,
    TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Refresh metrics
    pub static ref REFRESH_ATTEMPTS: IntCounter = IntCounter::new(
        "refresh_attempts_total",
        "Total number of upstream refresh attempts"
    ).unwrap();

    pub static ref REFRESH_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("refresh_failures_total", "Failed refresh attempts by failure kind"),
        &["kind"]
    ).unwrap();

    pub static ref REFRESH_EXHAUSTED: IntCounter = IntCounter::new(
        "refresh_exhausted_total",
        "Refreshes that used up every retry"
    ).unwrap();

    // Cache metrics
    pub static ref SLOT_PRICES_LEN: IntGaugeVec = IntGaugeVec::new(
        Opts::new("slot_prices_len", "Number of prices currently cached per slot"),
        &["slot"]
    ).unwrap();

    // Latency metrics
    pub static ref UPSTREAM_FETCH_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "upstream_fetch_latency_seconds",
            "ENTSO-E request latency"
        ).buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0])
    ).unwrap();
}

pub fn register_metrics() -> prometheus::Result<()> {
    REGISTRY.register(Box::new(REFRESH_ATTEMPTS.clone()))?;
    REGISTRY.register(Box::new(REFRESH_FAILURES.clone()))?;
    REGISTRY.register(Box::new(REFRESH_EXHAUSTED.clone()))?;
    REGISTRY.register(Box::new(SLOT_PRICES_LEN.clone()))?;
    REGISTRY.register(Box::new(UPSTREAM_FETCH_LATENCY.clone()))?;
    Ok(())
}

/// Prometheus text exposition of everything in [`REGISTRY`].
pub fn render() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}
