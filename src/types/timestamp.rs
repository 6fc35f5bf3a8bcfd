use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use crate::error::{Error, Result};

/// Seconds since the Unix epoch, as carried in client payloads.
pub type EpochSeconds = i64;

/// Parse an upstream interval boundary such as `2024-01-01T00:00Z`.
///
/// ENTSO-E omits seconds; full RFC 3339 is accepted as well.
pub fn parse_upstream_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ") {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::DataFormat(format!("invalid timestamp {:?}: {}", s, e)))
}

/// Upstream query format; minutes must be zero or ENTSO-E answers 400.
pub fn format_upstream_period(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%d%H00").to_string()
}

/// Resolve a wall-clock time on a local date to UTC.
pub fn local_to_utc(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::ConfigError(format!("{} {} does not exist in {}", date, time, tz)))
}
