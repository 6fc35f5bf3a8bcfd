use chrono::{DateTime, Days, NaiveTime, Utc};
use chrono_tz::Tz;
use crate::config::scheduler::SchedulerConfig;
use crate::error::{Error, Result};
use crate::source::QueryWindow;
use crate::types::market::Resolution;
use crate::types::timestamp::{local_to_utc, EpochSeconds};

/// Market-local calendar: query windows and the next-refresh time.
#[derive(Clone, Debug)]
pub struct RefreshCalendar {
    timezone: Tz,
    cutover: NaiveTime,
    horizon_days: u32,
}

impl RefreshCalendar {
    pub fn new(timezone: Tz, cutover: NaiveTime, horizon_days: u32) -> Self {
        RefreshCalendar { timezone, cutover, horizon_days }
    }

    pub fn from_config(config: &SchedulerConfig) -> Result<Self> {
        Ok(Self::new(config.market_timezone()?, config.cutover_time()?, config.horizon_days))
    }

    /// From local midnight today to `horizon_days` local midnights later.
    pub fn query_window(&self, now: DateTime<Utc>, resolution: Resolution) -> Result<QueryWindow> {
        let local_date = now.with_timezone(&self.timezone).date_naive();
        let end_date = local_date
            .checked_add_days(Days::new(self.horizon_days as u64))
            .ok_or_else(|| Error::ConfigError("query horizon overflows the calendar".to_string()))?;

        Ok(QueryWindow {
            start: local_to_utc(&self.timezone, local_date, NaiveTime::default())?,
            end: local_to_utc(&self.timezone, end_date, NaiveTime::default())?,
            resolution,
            local_date,
        })
    }

    /// Data ending by tomorrow's local midnight: come back at today's
    /// cutover, when tomorrow's auction results are due. Data reaching into
    /// tomorrow: tomorrow's cutover.
    ///
    /// Coverage is judged by time, since a local day has 23 to 25 hours.
    pub fn next_refresh(&self, window: &QueryWindow, covered_until: DateTime<Utc>) -> Result<EpochSeconds> {
        let tomorrow = window.local_date
            .succ_opt()
            .ok_or_else(|| Error::ConfigError("calendar overflow".to_string()))?;
        let tomorrow_midnight = local_to_utc(&self.timezone, tomorrow, NaiveTime::default())?;

        let date = if covered_until > tomorrow_midnight { tomorrow } else { window.local_date };
        Ok(local_to_utc(&self.timezone, date, self.cutover)?.timestamp())
    }
}
