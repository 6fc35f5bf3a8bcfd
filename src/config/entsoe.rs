use std::path::PathBuf;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct EntsoeConfig {
    pub base_url: String,
    /// Takes precedence over `token_file` when set.
    pub security_token: Option<String>,
    pub token_file: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for EntsoeConfig {
    fn default() -> Self {
        EntsoeConfig {
            base_url: "https://web-api.tp.entsoe.eu/api".to_string(),
            security_token: None,
            token_file: Some(PathBuf::from("entsoe.key")),
            request_timeout_secs: 30,
            user_agent: concat!("dayahead/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl EntsoeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Load the upstream credential once at startup.
    pub fn resolve_token(&self) -> Result<String> {
        if let Some(token) = self.security_token.as_deref().map(str::trim) {
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }

        let path = self.token_file.as_ref()
            .ok_or_else(|| Error::ConfigError("no ENTSO-E security token configured".to_string()))?;
        let token = std::fs::read_to_string(path)?;
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::ConfigError(format!("token file {:?} is empty", path)));
        }
        Ok(token.to_string())
    }
}
