use std::time::Duration;
use serde::{Deserialize, Serialize};

pub mod entsoe;
pub mod scheduler;
pub mod loader;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Fewest hourly values accepted from the provider.
    pub min_hourly_values: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            base_url: "https://api.open-meteo.com/v1/dwd-icon".to_string(),
            request_timeout_secs: 10,
            min_hourly_values: 47,
        }
    }
}

impl ForecastConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            json: false,
        }
    }
}
