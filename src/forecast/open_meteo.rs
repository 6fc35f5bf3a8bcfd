use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use crate::config::ForecastConfig;
use crate::error::{Error, Result};
use crate::forecast::Coordinates;
use crate::types::timestamp::EpochSeconds;
use crate::utils::helper::truncate_for_log;

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    #[serde(default)]
    hourly: Option<OpenMeteoHourly>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenMeteoHourly {
    #[serde(default)]
    time: Vec<EpochSeconds>,
    #[serde(default)]
    temperature_2m: Vec<f64>,
}

/// Client payload: tenths of a degree Celsius, one value per hour from
/// local midnight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureForecast {
    pub first_date: EpochSeconds,
    pub hourly: Vec<i64>,
}

impl TemperatureForecast {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::SerializationError(e.to_string()))
    }
}

/// DWD ICON model via Open-Meteo. No caching, no retries.
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
    min_hourly_values: usize,
}

impl OpenMeteoClient {
    pub fn new(config: &ForecastConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::ConfigError(format!("failed to build Open-Meteo client: {}", e)))?;

        Ok(OpenMeteoClient {
            client,
            base_url: config.base_url.clone(),
            min_hourly_values: config.min_hourly_values,
        })
    }

    pub async fn fetch(&self, coords: Coordinates) -> Result<TemperatureForecast> {
        debug!("Fetching temperatures for {}, {}", coords.latitude, coords.longitude);

        let resp = self.client
            .get(&self.base_url)
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("hourly", "temperature_2m".to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", "2".to_string()),
                ("timeformat", "unixtime".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Open-Meteo connection error: {}", e);
                Error::ForecastUnavailable(e.to_string())
            })?;

        let status = resp.status();
        let body = resp.text()
            .await
            .map_err(|e| Error::ForecastUnavailable(e.to_string()))?;

        if status == StatusCode::BAD_REQUEST {
            error!("Open-Meteo rejected request: {}", truncate_for_log(&body, 200));
            return Err(Error::ForecastRejected);
        }
        if !status.is_success() {
            error!("Open-Meteo returned status {}", status);
            return Err(Error::ForecastUnavailable(format!("status {}", status.as_u16())));
        }

        parse_forecast(&body, self.min_hourly_values).inspect_err(|e| {
            error!("Open-Meteo data parsing error: {}", e);
        })
    }
}

fn parse_forecast(body: &str, min_values: usize) -> Result<TemperatureForecast> {
    let response: OpenMeteoResponse = serde_json::from_str(body)
        .map_err(|e| Error::ForecastMalformed(e.to_string()))?;
    let hourly = response.hourly.unwrap_or_default();

    if hourly.time.len() < min_values || hourly.temperature_2m.len() < min_values {
        return Err(Error::ForecastMalformed(format!(
            "need at least {} hourly values, got {}",
            min_values,
            hourly.time.len().min(hourly.temperature_2m.len())
        )));
    }

    let first_date = *hourly.time.first()
        .ok_or_else(|| Error::ForecastMalformed("empty time axis".to_string()))?;

    Ok(TemperatureForecast {
        first_date,
        hourly: hourly.temperature_2m
            .iter()
            .map(|t| (t * 10.0).round_ties_even() as i64)
            .collect(),
    })
}
