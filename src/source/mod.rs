pub mod document;
pub mod entsoe;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use crate::error::Result;
use crate::source::document::PriceDocument;
use crate::types::market::{BiddingZone, Resolution};

/// Time window of one upstream query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub resolution: Resolution,
    /// Market-local calendar date `start` falls on.
    pub local_date: NaiveDate,
}

/// Upstream day-ahead price source.
///
/// Implementations hold no per-call state; one instance is shared by every
/// slot and every retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_day_ahead(&self, zone: BiddingZone, window: &QueryWindow) -> Result<PriceDocument>;
}
