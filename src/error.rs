use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Upstream Errors
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream returned status {status}: {body}")]
    UpstreamStatus {
        status: u16,
        body: String,
    },

    #[error("Rate limited by upstream (retry after {retry_after_secs:?}s)")]
    RateLimited {
        retry_after_secs: Option<u64>,
    },

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("No data for requested window: {0}")]
    NoData(String),

    // Document Errors
    #[error("Data format error: {0}")]
    DataFormat(String),

    #[error("Insufficient data: need at least {expected} values, got {actual}")]
    InsufficientData {
        expected: usize,
        actual: usize,
    },

    // API Errors
    #[error("Country not supported: {0}")]
    UnsupportedCountry(String),

    #[error("Resolution not supported: {0}")]
    UnsupportedResolution(String),

    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("Data not found")]
    NotYetAvailable,

    // Forecast Errors
    #[error("Weather provider rejected coordinates")]
    ForecastRejected,

    #[error("Weather provider unavailable: {0}")]
    ForecastUnavailable(String),

    #[error("Weather provider response malformed: {0}")]
    ForecastMalformed(String),

    // System Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Task failure: {0}")]
    TaskFailed(String),

    // IO Errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Closed set of upstream failure kinds seen by the refresh loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Transport,
    DataFormat,
    RateLimited,
    NoData,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::DataFormat => "data_format",
            FailureKind::RateLimited => "rate_limited",
            FailureKind::NoData => "no_data",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Upstream failure kind, `None` for errors that never come out of a fetch.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Error::Transport(_) | Error::UpstreamStatus { .. } | Error::Timeout(_) => {
                Some(FailureKind::Transport)
            }
            Error::RateLimited { .. } => Some(FailureKind::RateLimited),
            Error::NoData(_) => Some(FailureKind::NoData),
            Error::DataFormat(_) | Error::InsufficientData { .. } => Some(FailureKind::DataFormat),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_map_to_failure_kinds() {
        assert_eq!(
            Error::UpstreamStatus { status: 503, body: String::new() }.kind(),
            Some(FailureKind::Transport)
        );
        assert_eq!(Error::Timeout(Duration::from_secs(1)).kind(), Some(FailureKind::Transport));
        assert_eq!(
            Error::RateLimited { retry_after_secs: None }.kind(),
            Some(FailureKind::RateLimited)
        );
        assert_eq!(
            Error::InsufficientData { expected: 92, actual: 4 }.kind(),
            Some(FailureKind::DataFormat)
        );
        assert_eq!(Error::NoData("999".into()).kind(), Some(FailureKind::NoData));
        assert_eq!(Error::NotYetAvailable.kind(), None);
    }
}
