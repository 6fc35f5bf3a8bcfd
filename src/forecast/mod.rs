//! Hourly temperature forecast, fetched on demand.

pub mod open_meteo;

use crate::error::{Error, Result};

/// Validated WGS84 coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Parse path segments. Both formats are checked before either range.
    pub fn parse(lat: &str, lon: &str) -> Result<Self> {
        let latitude: f64 = lat.trim().parse()
            .map_err(|_| Error::InvalidInput("Invalid latitude format"))?;
        let longitude: f64 = lon.trim().parse()
            .map_err(|_| Error::InvalidInput("Invalid longitude format"))?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidInput("Latitude must be between -90 and 90"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidInput("Longitude must be between -180 and 180"));
        }

        Ok(Coordinates { latitude, longitude })
    }
}
