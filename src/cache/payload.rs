use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::types::price::Price;
use crate::types::series::RegularSeries;
use crate::types::timestamp::EpochSeconds;

/// Client-facing price document.
///
/// Field order is part of the wire contract: embedded clients read the body
/// positionally, so it is always emitted as `first_date`, `prices`,
/// `next_date` with no whitespace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceResponse {
    pub first_date: EpochSeconds,
    pub prices: Vec<i64>,
    pub next_date: EpochSeconds,
}

impl PriceResponse {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::SerializationError(e.to_string()))
    }

    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| Error::SerializationError(e.to_string()))
    }
}

/// What a slot holds: a built price document or a not-found marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedPayload {
    first_date: EpochSeconds,
    prices: Vec<i64>,
    next_date: EpochSeconds,
    found: bool,
    body: String,
}

impl CachedPayload {
    pub fn new(first_date: EpochSeconds, prices: Vec<i64>, next_date: EpochSeconds) -> Result<Self> {
        if next_date <= first_date {
            return Err(Error::DataFormat(format!(
                "next_date {} is not after first_date {}",
                next_date, first_date
            )));
        }

        let response = PriceResponse { first_date, prices, next_date };
        let body = response.to_json()?;

        Ok(CachedPayload {
            first_date,
            prices: response.prices,
            next_date,
            found: true,
            body,
        })
    }

    /// Build from a resampled series; prices are truncated to hundredths.
    pub fn from_series(series: &RegularSeries, next_date: EpochSeconds) -> Result<Self> {
        let first_date = series.start()
            .ok_or_else(|| Error::NoData("resampled series is empty".to_string()))?
            .timestamp();
        let prices = series.values()
            .iter()
            .map(|v| Price::from_f64(*v).to_i64())
            .collect();

        Self::new(first_date, prices, next_date)
    }

    pub fn not_found() -> Self {
        CachedPayload {
            first_date: 0,
            prices: Vec::new(),
            next_date: 0,
            found: false,
            body: String::new(),
        }
    }

    pub fn first_date(&self) -> EpochSeconds {
        self.first_date
    }

    pub fn prices(&self) -> &[i64] {
        &self.prices
    }

    pub fn next_date(&self) -> EpochSeconds {
        self.next_date
    }

    pub fn is_found(&self) -> bool {
        self.found
    }

    /// Rendered JSON, identical for every request served from this payload.
    pub fn body(&self) -> &str {
        &self.body
    }

    #[cfg(test)]
    pub(crate) fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn body_is_compact_and_ordered() {
        let payload = CachedPayload::new(1_700_000_000, vec![1000, -25, 1300], 1_700_100_000).unwrap();
        assert_eq!(
            payload.body(),
            r#"{"first_date":1700000000,"prices":[1000,-25,1300],"next_date":1700100000}"#
        );
        assert!(payload.is_found());
    }

    #[test]
    fn next_date_must_follow_first_date() {
        assert!(matches!(
            CachedPayload::new(100, vec![1], 100),
            Err(Error::DataFormat(_))
        ));
    }

    #[test]
    fn series_values_are_truncated_to_hundredths() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let series = RegularSeries::new(start, Duration::minutes(60), vec![10.50, 12.349, -0.017]);
        let payload = CachedPayload::from_series(&series, start.timestamp() + 3600).unwrap();
        assert_eq!(payload.prices(), &[1050, 1234, -1]);
        assert_eq!(payload.first_date(), start.timestamp());
    }

    #[test]
    fn empty_series_cannot_build_a_payload() {
        let series = RegularSeries::empty(Duration::minutes(15));
        assert!(matches!(CachedPayload::from_series(&series, 1), Err(Error::NoData(_))));
    }

    #[test]
    fn body_parses_back() {
        let payload = CachedPayload::new(10, vec![1, 2, 3], 20).unwrap();
        let parsed = PriceResponse::from_json(payload.body()).unwrap();
        assert_eq!(parsed.first_date, 10);
        assert_eq!(parsed.prices, vec![1, 2, 3]);
        assert_eq!(parsed.next_date, 20);
    }

    #[test]
    fn not_found_has_no_body() {
        let payload = CachedPayload::not_found();
        assert!(!payload.is_found());
        assert!(payload.body().is_empty());
    }
}
