use std::time::Duration;
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub tick_interval_secs: u64,
    pub max_attempts: u32,
    pub backoff_step_secs: u64,
    pub fetch_timeout_secs: u64,
    /// Intraday time (`HH:MM`, market-local) at which new day-ahead data is expected.
    pub cutover: String,
    pub timezone: String,
    pub horizon_days: u32,
    /// Keep serving the previous payload when every retry of a refresh fails.
    pub retain_last_good: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            tick_interval_secs: 300,    // 5 minutes
            max_attempts: 5,
            backoff_step_secs: 60,
            fetch_timeout_secs: 45,
            cutover: "13:30".to_string(),
            timezone: "Europe/Berlin".to_string(),
            horizon_days: 7,
            retain_last_good: true,
        }
    }
}

impl SchedulerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    pub fn backoff_step(&self) -> Duration {
        Duration::from_secs(self.backoff_step_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn cutover_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(self.cutover.trim(), "%H:%M")
            .map_err(|e| Error::ConfigError(format!("invalid cutover {:?}: {}", self.cutover, e)))
    }

    pub fn market_timezone(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>()
            .map_err(|e| Error::ConfigError(format!("invalid timezone {:?}: {}", self.timezone, e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::ConfigError("scheduler.max_attempts must be at least 1".to_string()));
        }
        if self.tick_interval_secs == 0 || self.fetch_timeout_secs == 0 {
            return Err(Error::ConfigError("scheduler intervals must be non-zero".to_string()));
        }
        if self.horizon_days < 2 {
            return Err(Error::ConfigError("scheduler.horizon_days must cover tomorrow".to_string()));
        }
        self.cutover_time()?;
        self.market_timezone()?;
        Ok(())
    }
}
