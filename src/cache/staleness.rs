//! Decides whether a slot's cached payload must be renewed.

use std::fmt;
use crate::cache::payload::{CachedPayload, PriceResponse};
use crate::types::timestamp::EpochSeconds;

/// Refresh this long before `next_date`, ahead of clients polling again.
pub const STALENESS_MARGIN_SECS: i64 = 30 * 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Staleness {
    Fresh,
    Absent,
    Malformed,
    NotFound,
    NextDateReached,
    TooShort { len: usize, min: usize },
}

impl Staleness {
    pub fn is_stale(&self) -> bool {
        !matches!(self, Staleness::Fresh)
    }
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Staleness::Fresh => f.write_str("fresh"),
            Staleness::Absent => f.write_str("no payload cached"),
            Staleness::Malformed => f.write_str("cached payload is malformed"),
            Staleness::NotFound => f.write_str("cached payload is marked not found"),
            Staleness::NextDateReached => f.write_str("next_date is within the refresh margin"),
            Staleness::TooShort { len, min } => write!(f, "price list too short ({} < {})", len, min),
        }
    }
}

/// Rules apply in order, first match wins. Nothing here can fail: a payload
/// that cannot be read back is reported as `Malformed`.
pub fn evaluate(payload: Option<&CachedPayload>, min_length: usize, now: EpochSeconds) -> Staleness {
    let Some(payload) = payload else {
        return Staleness::Absent;
    };

    if !payload.is_found() {
        // A not-found marker carries no body to check.
        return Staleness::NotFound;
    }

    let Ok(stored) = PriceResponse::from_json(payload.body()) else {
        return Staleness::Malformed;
    };
    if stored.next_date <= stored.first_date {
        return Staleness::Malformed;
    }

    match stored.next_date.checked_sub(STALENESS_MARGIN_SECS) {
        Some(deadline) if deadline >= now => {}
        Some(_) => return Staleness::NextDateReached,
        None => return Staleness::Malformed,
    }

    if stored.prices.len() < min_length {
        return Staleness::TooShort { len: stored.prices.len(), min: min_length };
    }

    Staleness::Fresh
}

pub fn is_stale(payload: Option<&CachedPayload>, min_length: usize, now: EpochSeconds) -> bool {
    evaluate(payload, min_length, now).is_stale()
}
