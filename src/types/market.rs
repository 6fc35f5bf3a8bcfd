use std::fmt;
use crate::error::{Error, Result};

/// Bidding zone served by the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BiddingZone {
    DeLu,
    At,
}

impl BiddingZone {
    /// EIC area code used by ENTSO-E.
    pub fn eic_code(&self) -> &'static str {
        match self {
            BiddingZone::DeLu => "10Y1001A1001A82H",
            BiddingZone::At => "10YAT-APG------L",
        }
    }
}

impl fmt::Display for BiddingZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BiddingZone::DeLu => f.write_str("DE-LU"),
            BiddingZone::At => f.write_str("AT"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Country {
    De,
    Lu,
    At,
}

impl Country {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "de" => Ok(Country::De),
            "lu" => Ok(Country::Lu),
            "at" => Ok(Country::At),
            _ => Err(Error::UnsupportedCountry(s.to_string())),
        }
    }

    /// DE and LU share one bidding zone.
    pub fn zone(&self) -> BiddingZone {
        match self {
            Country::De | Country::Lu => BiddingZone::DeLu,
            Country::At => BiddingZone::At,
        }
    }
}

/// Price grid resolution offered to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    Min15,
    Min60,
}

impl Resolution {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "15min" => Ok(Resolution::Min15),
            "60min" => Ok(Resolution::Min60),
            _ => Err(Error::UnsupportedResolution(s.to_string())),
        }
    }

    /// ISO-8601 duration label used in upstream documents.
    pub fn iso_label(&self) -> &'static str {
        match self {
            Resolution::Min15 => "PT15M",
            Resolution::Min60 => "PT60M",
        }
    }

    pub fn points_per_hour(&self) -> usize {
        match self {
            Resolution::Min15 => 4,
            Resolution::Min60 => 1,
        }
    }

    /// Fewest values a fetch may return and still be accepted (23 hours, DST short day).
    pub fn min_accepted_len(&self) -> usize {
        23 * self.points_per_hour()
    }

    /// Values a cached payload needs to count as fresh: 25 hours worth.
    pub fn extended_horizon_len(&self) -> usize {
        25 * self.points_per_hour()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Min15 => f.write_str("15min"),
            Resolution::Min60 => f.write_str("60min"),
        }
    }
}

/// One of the four fixed cache slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarketSlot {
    pub zone: BiddingZone,
    pub resolution: Resolution,
}

impl MarketSlot {
    pub const ALL: [MarketSlot; 4] = [
        MarketSlot { zone: BiddingZone::DeLu, resolution: Resolution::Min15 },
        MarketSlot { zone: BiddingZone::DeLu, resolution: Resolution::Min60 },
        MarketSlot { zone: BiddingZone::At, resolution: Resolution::Min15 },
        MarketSlot { zone: BiddingZone::At, resolution: Resolution::Min60 },
    ];

    pub fn new(zone: BiddingZone, resolution: Resolution) -> Self {
        MarketSlot { zone, resolution }
    }

    /// Resolve an API path pair. Country is checked before resolution.
    pub fn lookup(country: &str, resolution: &str) -> Result<Self> {
        let country = Country::parse(country)?;
        let resolution = Resolution::parse(resolution)?;
        Ok(MarketSlot::new(country.zone(), resolution))
    }
}

impl fmt::Display for MarketSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.zone, self.resolution)
    }
}
