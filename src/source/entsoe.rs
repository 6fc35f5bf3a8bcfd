use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use tracing::{debug, Instrument};
use crate::config::entsoe::EntsoeConfig;
use crate::error::{Error, Result};
use crate::observability::metrics::UPSTREAM_FETCH_LATENCY;
use crate::observability::tracing::trace_upstream_fetch;
use crate::source::document::PriceDocument;
use crate::source::{PriceSource, QueryWindow};
use crate::types::market::BiddingZone;
use crate::types::timestamp::format_upstream_period;
use crate::utils::helper::truncate_for_log;

/// Day-ahead prices (`documentType=A44`) from the ENTSO-E Transparency Platform.
pub struct EntsoeClient {
    client: reqwest::Client,
    base_url: String,
    security_token: String,
}

impl EntsoeClient {
    pub fn new(config: &EntsoeConfig, security_token: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .pool_max_idle_per_host(2)
            .build()
            .map_err(|e| Error::ConfigError(format!("failed to build ENTSO-E client: {}", e)))?;

        Ok(EntsoeClient {
            client,
            base_url: config.base_url.clone(),
            security_token,
        })
    }

    async fn fetch(&self, zone: BiddingZone, window: &QueryWindow) -> Result<PriceDocument> {
        let period_start = format_upstream_period(&window.start);
        let period_end = format_upstream_period(&window.end);

        debug!(
            "Querying ENTSO-E for {} {} from {} to {}",
            zone, window.resolution, period_start, period_end
        );

        let _timer = UPSTREAM_FETCH_LATENCY.start_timer();

        // Error text must not carry the URL, it contains the token.
        let resp = self.client
            .get(&self.base_url)
            .query(&[
                ("securityToken", self.security_token.as_str()),
                ("documentType", "A44"),
                ("in_Domain", zone.eic_code()),
                ("out_Domain", zone.eic_code()),
                ("periodStart", period_start.as_str()),
                ("periodEnd", period_end.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp.headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            return Err(Error::RateLimited { retry_after_secs });
        }

        let body = resp.text()
            .await
            .map_err(|e| Error::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            // ENTSO-E reports an empty window as an acknowledgement, sometimes with a 400.
            if let Err(e @ Error::NoData(_)) = PriceDocument::from_xml(&body) {
                return Err(e);
            }
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                body: truncate_for_log(&body, 500).to_string(),
            });
        }

        let document = PriceDocument::from_xml(&body)?;
        debug!("ENTSO-E returned {} points for {}", document.point_count(), zone);
        Ok(document)
    }
}

#[async_trait]
impl PriceSource for EntsoeClient {
    async fn fetch_day_ahead(&self, zone: BiddingZone, window: &QueryWindow) -> Result<PriceDocument> {
        self.fetch(zone, window)
            .instrument(trace_upstream_fetch(zone, window))
            .await
    }
}
