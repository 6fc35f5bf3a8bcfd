//! Schema for ENTSO-E market documents.
//!
//! The raw serde structs mirror the XML. They are validated into
//! [`PriceDocument`] before anything downstream sees them.

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use crate::error::{Error, Result};
use crate::types::series::{RawPoint, MAX_SERIES_LEN};
use crate::types::timestamp::parse_upstream_timestamp;

/// Reason code ENTSO-E uses for "No matching data found".
pub const NO_MATCHING_DATA_CODE: &str = "999";

// Raw XML schema

#[derive(Debug, Deserialize)]
struct RawMarketDocument {
    #[serde(rename = "TimeSeries", default)]
    time_series: Vec<RawTimeSeries>,
}

#[derive(Debug, Deserialize)]
struct RawTimeSeries {
    #[serde(rename = "Period", default)]
    periods: Vec<RawPeriod>,
}

#[derive(Debug, Deserialize)]
struct RawPeriod {
    #[serde(rename = "timeInterval")]
    time_interval: RawTimeInterval,
    resolution: String,
    #[serde(rename = "Point", default)]
    points: Vec<RawPointXml>,
}

#[derive(Debug, Deserialize)]
struct RawTimeInterval {
    start: String,
}

#[derive(Debug, Deserialize)]
struct RawPointXml {
    position: i64,
    #[serde(rename = "price.amount")]
    price_amount: f64,
}

#[derive(Debug, Deserialize)]
struct RawAcknowledgement {
    #[serde(rename = "Reason", default)]
    reasons: Vec<RawReason>,
}

#[derive(Debug, Deserialize)]
struct RawReason {
    #[serde(default)]
    code: String,
    #[serde(default)]
    text: String,
}

// Validated document

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceDocument {
    pub series: Vec<SeriesData>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesData {
    pub periods: Vec<PeriodData>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PeriodData {
    pub start: DateTime<Utc>,
    pub resolution: String,
    pub points: Vec<RawPoint>,
}

impl PriceDocument {
    /// Parse and validate an upstream body.
    ///
    /// An acknowledgement document in place of a market document means the
    /// upstream had nothing for the window and yields [`Error::NoData`].
    pub fn from_xml(xml: &str) -> Result<Self> {
        match root_element(xml)?.as_str() {
            "Publication_MarketDocument" => {}
            "Acknowledgement_MarketDocument" => return Err(acknowledgement_error(xml)),
            other => {
                return Err(Error::DataFormat(format!("unexpected root element {}", other)));
            }
        }

        let raw: RawMarketDocument = quick_xml::de::from_str(xml)
            .map_err(|e| Error::DataFormat(e.to_string()))?;

        let series = raw.time_series
            .into_iter()
            .map(|ts| {
                let periods = ts.periods
                    .into_iter()
                    .map(PeriodData::try_from)
                    .collect::<Result<Vec<_>>>()?;
                Ok(SeriesData { periods })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PriceDocument { series })
    }

    pub fn point_count(&self) -> usize {
        self.series.iter()
            .flat_map(|s| s.periods.iter())
            .map(|p| p.points.len())
            .sum()
    }
}

impl TryFrom<RawPeriod> for PeriodData {
    type Error = Error;

    fn try_from(raw: RawPeriod) -> Result<Self> {
        let start = parse_upstream_timestamp(&raw.time_interval.start)?;
        let points = raw.points
            .into_iter()
            .map(|p| {
                if p.position < 1 || p.position > MAX_SERIES_LEN {
                    return Err(Error::DataFormat(format!("invalid point position {}", p.position)));
                }
                if !p.price_amount.is_finite() {
                    return Err(Error::DataFormat(format!("non-finite price at position {}", p.position)));
                }
                Ok(RawPoint { position: p.position as u32, value: p.price_amount })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PeriodData {
            start,
            resolution: raw.resolution.trim().to_string(),
            points,
        })
    }
}

fn root_element(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => return Err(Error::DataFormat("empty document".to_string())),
            Ok(_) => continue,
            Err(e) => return Err(Error::DataFormat(e.to_string())),
        }
    }
}

fn acknowledgement_error(xml: &str) -> Error {
    match quick_xml::de::from_str::<RawAcknowledgement>(xml) {
        Ok(ack) => {
            let reason = ack.reasons.first();
            match reason {
                Some(r) if r.code != NO_MATCHING_DATA_CODE && !r.code.is_empty() => {
                    Error::DataFormat(format!("acknowledgement {}: {}", r.code, r.text))
                }
                Some(r) => Error::NoData(r.text.clone()),
                None => Error::NoData("acknowledgement without reason".to_string()),
            }
        }
        Err(e) => Error::DataFormat(format!("unreadable acknowledgement: {}", e)),
    }
}
