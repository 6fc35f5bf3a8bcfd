//! Periodic refresh of the four price slots.
//!
//! One task walks the slots in catalog order on a fixed cadence. Slots are
//! never refreshed concurrently. A slot that fails only affects itself: its
//! retries and backoff run to completion, then the pass moves on.

pub mod calendar;
pub mod retry;

use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn, Instrument};
use crate::cache::payload::CachedPayload;
use crate::cache::slot_cache::SlotCache;
use crate::cache::staleness::{self, Staleness};
use crate::config::scheduler::SchedulerConfig;
use crate::error::{Error, Result};
use crate::observability::metrics::{REFRESH_ATTEMPTS, REFRESH_EXHAUSTED, REFRESH_FAILURES};
use crate::observability::tracing::trace_slot_refresh;
use crate::resample::grid::GridResampler;
use crate::scheduler::calendar::RefreshCalendar;
use crate::scheduler::retry::{RetryPolicy, RetryState};
use crate::source::{PriceSource, QueryWindow};
use crate::types::market::MarketSlot;
use crate::types::series::RegularSeries;

pub type Clock = fn() -> DateTime<Utc>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Cached payload still valid; upstream not contacted.
    Fresh,
    Refreshed { prices: usize, next_date: i64 },
    /// Every attempt failed. `retained` tells whether the previous payload was kept.
    Exhausted { retained: bool },
}

#[derive(Clone, Debug)]
pub struct SlotReport {
    pub slot: MarketSlot,
    pub staleness: Staleness,
    pub outcome: RefreshOutcome,
    pub attempts: u32,
    pub delays: Vec<Duration>,
}

pub struct RefreshScheduler {
    source: Arc<dyn PriceSource>,
    cache: Arc<SlotCache>,
    policy: RetryPolicy,
    calendar: RefreshCalendar,
    tick_interval: Duration,
    fetch_timeout: Duration,
    retain_last_good: bool,
    clock: Clock,
}

impl RefreshScheduler {
    pub fn new(
        source: Arc<dyn PriceSource>,
        cache: Arc<SlotCache>,
        config: &SchedulerConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(RefreshScheduler {
            source,
            cache,
            policy: RetryPolicy::new(config.max_attempts, config.backoff_step()),
            calendar: RefreshCalendar::from_config(config)?,
            tick_interval: config.tick_interval(),
            fetch_timeout: config.fetch_timeout(),
            retain_last_good: config.retain_last_good,
            clock: Utc::now,
        })
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Refresh loop. The caller runs the first [`run_pass`](Self::run_pass)
    /// itself before serving traffic, so the immediate first tick is skipped.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let reports = self.run_pass().await;
            let refreshed = reports.iter()
                .filter(|r| matches!(r.outcome, RefreshOutcome::Refreshed { .. }))
                .count();
            debug!("Refresh pass done: {} of {} slots refreshed", refreshed, reports.len());
        }
    }

    /// Check every slot once, refreshing stale ones in catalog order.
    pub async fn run_pass(&self) -> Vec<SlotReport> {
        let mut reports = Vec::with_capacity(MarketSlot::ALL.len());
        for slot in MarketSlot::ALL {
            let report = self.refresh_slot(slot)
                .instrument(trace_slot_refresh(&slot))
                .await;
            reports.push(report);
        }
        reports
    }

    async fn refresh_slot(&self, slot: MarketSlot) -> SlotReport {
        let current = self.cache.get(&slot);
        let now = (self.clock)().timestamp();
        let staleness = staleness::evaluate(
            current.as_deref(),
            slot.resolution.extended_horizon_len(),
            now,
        );

        if !staleness.is_stale() {
            debug!("No update necessary for {}", slot);
            return SlotReport {
                slot,
                staleness,
                outcome: RefreshOutcome::Fresh,
                attempts: 0,
                delays: Vec::new(),
            };
        }

        debug!("Update {} because {}", slot, staleness);

        let mut retry = RetryState::default();
        for attempt in 0..self.policy.max_attempts {
            retry.attempts += 1;
            REFRESH_ATTEMPTS.inc();

            match self.attempt(slot).await {
                Ok(payload) => {
                    let outcome = RefreshOutcome::Refreshed {
                        prices: payload.prices().len(),
                        next_date: payload.next_date(),
                    };
                    info!(
                        "Refreshed {}: {} prices from {}, next refresh at {}",
                        slot,
                        payload.prices().len(),
                        payload.first_date(),
                        payload.next_date()
                    );
                    self.cache.put(slot, payload);
                    return SlotReport {
                        slot,
                        staleness,
                        outcome,
                        attempts: retry.attempts,
                        delays: retry.delays,
                    };
                }
                Err(e) => {
                    let kind = e.kind().map(|k| k.as_str()).unwrap_or("other");
                    REFRESH_FAILURES.with_label_values(&[kind]).inc();
                    warn!(attempt = attempt + 1, kind, "Refresh of {} failed: {}", slot, e);

                    if let Some(delay) = self.policy.delay_after(attempt) {
                        debug!(delay_secs = delay.as_secs(), "Retrying {}", slot);
                        retry.delays.push(delay);
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        REFRESH_EXHAUSTED.inc();
        let retained = self.retain_last_good && current.as_ref().is_some_and(|p| p.is_found());
        if retained {
            warn!(
                "Giving up on {} after {} attempts ({:?} waited), keeping previous payload",
                slot, retry.attempts, retry.total_wait()
            );
        } else {
            error!(
                "Giving up on {} after {} attempts ({:?} waited), marking not found",
                slot, retry.attempts, retry.total_wait()
            );
            self.cache.put(slot, CachedPayload::not_found());
        }

        SlotReport {
            slot,
            staleness,
            outcome: RefreshOutcome::Exhausted { retained },
            attempts: retry.attempts,
            delays: retry.delays,
        }
    }

    /// One fetch → resample → build cycle.
    async fn attempt(&self, slot: MarketSlot) -> Result<CachedPayload> {
        let window = self.calendar.query_window((self.clock)(), slot.resolution)?;

        let document = tokio::time::timeout(
            self.fetch_timeout,
            self.source.fetch_day_ahead(slot.zone, &window),
        )
        .await
        .map_err(|_| Error::Timeout(self.fetch_timeout))??;

        let series = GridResampler::new(slot.resolution.iso_label())?.resample(&document)?;
        self.build_payload(&series, &window)
    }

    fn build_payload(&self, series: &RegularSeries, window: &QueryWindow) -> Result<CachedPayload> {
        if series.is_empty() {
            return Err(Error::NoData(format!(
                "no {} points in response",
                window.resolution.iso_label()
            )));
        }

        let min = window.resolution.min_accepted_len();
        if series.len() < min {
            return Err(Error::InsufficientData { expected: min, actual: series.len() });
        }

        let covered_until = series
            .end()
            .ok_or_else(|| Error::DataFormat("series end out of range".to_string()))?;
        let next_date = self.calendar.next_refresh(window, covered_until)?;
        CachedPayload::from_series(series, next_date)
    }
}
