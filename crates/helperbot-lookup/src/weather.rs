//! JMA overview forecast adapter.

use async_trait::async_trait;
use helperbot_core::lookup::{LookupError, WeatherForecast, WeatherSource};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::{USER_AGENT, check_response};

/// Public JMA endpoint.
pub const DEFAULT_JMA_BASE_URL: &str = "https://www.jma.go.jp";

/// Fetches `{base}/bosai/forecast/data/overview_forecast/{zone}.json`.
#[derive(Debug, Clone)]
pub struct JmaWeatherClient {
    client: Client,
    base_url: String,
}

impl JmaWeatherClient {
    /// Creates a client against `base_url`.
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Forecast URL for a zone.
    #[must_use]
    pub fn forecast_url(&self, zone: &str) -> String {
        format!(
            "{}/bosai/forecast/data/overview_forecast/{zone}.json",
            self.base_url
        )
    }
}

#[async_trait]
impl WeatherSource for JmaWeatherClient {
    #[instrument(skip(self))]
    async fn forecast(&self, zone: &str) -> Result<WeatherForecast, LookupError> {
        let response = check_response(
            self.client
                .get(self.forecast_url(zone))
                .header(reqwest::header::USER_AGENT, USER_AGENT)
                .send()
                .await,
        )?;
        let forecast: WeatherForecast = response
            .json()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))?;
        debug!(target_area = %forecast.target_area, "forecast fetched");
        Ok(forecast)
    }
}
