use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use crate::error::{Error, Result};
use crate::source::document::{PeriodData, PriceDocument};
use crate::types::series::{RawPoint, RegularSeries, SeriesResolution, MAX_SERIES_LEN};

/// Converts an upstream document into a gap-free series at one resolution.
///
/// - Periods declaring another resolution are skipped.
/// - When two points land on the same timestamp the first one in document
///   order is kept.
/// - Gaps between the earliest and latest observation are forward-filled.
#[derive(Clone, Copy, Debug)]
pub struct GridResampler {
    resolution: SeriesResolution,
}

impl GridResampler {
    /// Fails with `DataFormat` for labels without a fixed interval.
    pub fn new(label: &str) -> Result<Self> {
        Ok(GridResampler {
            resolution: SeriesResolution::from_label(label)?,
        })
    }

    /// Fails with `DataFormat` when a point falls off the calendar or the
    /// observations span more than [`MAX_SERIES_LEN`] steps.
    pub fn resample(&self, document: &PriceDocument) -> Result<RegularSeries> {
        let interval = self.resolution.interval();
        let observed = self.collect_points(document)?;

        let (first, last) = match (observed.keys().next(), observed.keys().next_back()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Ok(RegularSeries::empty(interval)),
        };

        let steps = (last - first).num_seconds() / interval.num_seconds();
        if steps >= MAX_SERIES_LEN {
            return Err(Error::DataFormat(format!(
                "observations span {} steps of {}, limit is {}",
                steps,
                self.resolution.label(),
                MAX_SERIES_LEN
            )));
        }

        let mut values = Vec::with_capacity(steps as usize + 1);
        let mut pending = observed.iter().peekable();
        let mut current = observed[&first];
        let mut ts = first;

        while ts <= last {
            while let Some((t, v)) = pending.peek() {
                if **t > ts {
                    break;
                }
                current = **v;
                pending.next();
            }
            values.push(current);
            ts = ts + interval;
        }

        Ok(RegularSeries::new(first, interval, values))
    }

    fn collect_points(&self, document: &PriceDocument) -> Result<BTreeMap<DateTime<Utc>, f64>> {
        let label = self.resolution.label();
        let mut observed = BTreeMap::new();

        let periods = document.series.iter()
            .flat_map(|s| s.periods.iter())
            .filter(|p| p.resolution == label);

        for period in periods {
            for point in &period.points {
                let ts = self.point_timestamp(period, point)?;
                observed.entry(ts).or_insert(point.value);
            }
        }

        Ok(observed)
    }

    /// `start + (position - 1) * interval`, checked.
    fn point_timestamp(&self, period: &PeriodData, point: &RawPoint) -> Result<DateTime<Utc>> {
        point.position
            .checked_sub(1)
            .and_then(|steps| i32::try_from(steps).ok())
            .and_then(|steps| self.resolution.interval().checked_mul(steps))
            .and_then(|offset| period.start.checked_add_signed(offset))
            .ok_or_else(|| Error::DataFormat(format!(
                "point position {} is out of range for a {} period",
                point.position,
                self.resolution.label()
            )))
    }
}
