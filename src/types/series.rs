use chrono::{DateTime, Duration, Utc};
use crate::error::{Error, Result};

/// Upper bound on the length of any series, and on a point's position.
pub const MAX_SERIES_LEN: i64 = 100_000;

/// Resolution label as it appears in an upstream period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeriesResolution {
    Min15,
    Min30,
    Min60,
    Day,
    Week,
    Month,
    Year,
}

impl SeriesResolution {
    pub fn from_label(label: &str) -> Result<Self> {
        match label {
            "PT15M" => Ok(SeriesResolution::Min15),
            "PT30M" => Ok(SeriesResolution::Min30),
            "PT60M" => Ok(SeriesResolution::Min60),
            "P1D" => Ok(SeriesResolution::Day),
            "P7D" => Ok(SeriesResolution::Week),
            "P1M" => Ok(SeriesResolution::Month),
            "P1Y" => Ok(SeriesResolution::Year),
            other => Err(Error::DataFormat(format!("unsupported resolution label {:?}", other))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeriesResolution::Min15 => "PT15M",
            SeriesResolution::Min30 => "PT30M",
            SeriesResolution::Min60 => "PT60M",
            SeriesResolution::Day => "P1D",
            SeriesResolution::Week => "P7D",
            SeriesResolution::Month => "P1M",
            SeriesResolution::Year => "P1Y",
        }
    }

    /// Fixed step length. Months and years are approximated as 30 and 365 days.
    pub fn interval(&self) -> Duration {
        match self {
            SeriesResolution::Min15 => Duration::minutes(15),
            SeriesResolution::Min30 => Duration::minutes(30),
            SeriesResolution::Min60 => Duration::minutes(60),
            SeriesResolution::Day => Duration::days(1),
            SeriesResolution::Week => Duration::days(7),
            SeriesResolution::Month => Duration::days(30),
            SeriesResolution::Year => Duration::days(365),
        }
    }
}

/// A value at a 1-based position inside a period.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawPoint {
    pub position: u32,
    pub value: f64,
}

/// Gap-free series at a fixed interval.
#[derive(Clone, Debug, PartialEq)]
pub struct RegularSeries {
    start: Option<DateTime<Utc>>,
    interval: Duration,
    values: Vec<f64>,
}

impl RegularSeries {
    pub fn empty(interval: Duration) -> Self {
        RegularSeries { start: None, interval, values: Vec::new() }
    }

    pub fn new(start: DateTime<Utc>, interval: Duration, values: Vec<f64>) -> Self {
        if values.is_empty() {
            return Self::empty(interval);
        }
        RegularSeries { start: Some(start), interval, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// End of the last interval, exclusive.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        let steps = i32::try_from(self.values.len()).ok()?;
        self.start?.checked_add_signed(self.interval.checked_mul(steps)?)
    }
}
