use crate::config::entsoe::EntsoeConfig;
use crate::config::scheduler::SchedulerConfig;
use crate::config::*;
use crate::error::{Error, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub entsoe: EntsoeConfig,
    pub scheduler: SchedulerConfig,
    pub forecast: ForecastConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Layered load: `config/default`, then `config/{env}`, then `DAYAHEAD__*` variables.
    pub fn load(env: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("DAYAHEAD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        let app: AppConfig = config.try_deserialize()
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        app.scheduler.validate()?;
        Ok(app)
    }
}
