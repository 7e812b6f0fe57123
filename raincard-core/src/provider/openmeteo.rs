use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{HourlyForecastProvider, HourlySeries, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1";

/// Open-Meteo forecast endpoint, used only for hourly precipitation probability.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl HourlyForecastProvider for OpenMeteoProvider {
    #[instrument(skip(self))]
    async fn fetch_hourly(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Result<HourlySeries> {
        let url = format!("{}/forecast", self.base_url);
        let date = date.format("%Y-%m-%d").to_string();
        debug!(%url, %date, "requesting hourly rain forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", "precipitation_probability".to_string()),
                ("timezone", "auto".to_string()),
                ("start_date", date.clone()),
                ("end_date", date),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo (hourly forecast)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Open-Meteo response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo hourly request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OmResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo hourly JSON")?;

        Ok(HourlySeries {
            time: parsed.hourly.time,
            precipitation_probability: parsed
                .hourly
                .precipitation_probability
                .iter()
                .map(probability_value)
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    precipitation_probability: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    hourly: OmHourly,
}

/// Numbers pass through and numeric strings are parsed; anything else is unknown.
fn probability_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
