use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::model::{CurrentWeather, round_half_up};

use super::{CurrentWeatherProvider, CurrentWeatherReply, mask_credential};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Display-language hint sent with every lookup unless configured otherwise.
pub const DEFAULT_LANGUAGE: &str = "pt_br";

const MPS_TO_KMH: f64 = 3.6;

/// OpenWeather current-weather endpoint (`/weather`).
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    language: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(base_url: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: language.into(),
            http: Client::new(),
        }
    }
}

impl Default for OpenWeatherProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_LANGUAGE)
    }
}

#[async_trait]
impl CurrentWeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, credential), fields(language = %self.language))]
    async fn fetch_current(&self, city: &str, credential: &str) -> Result<CurrentWeatherReply> {
        let url = format!("{}/weather", self.base_url);
        debug!(%url, credential = %mask_credential(credential), "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", credential),
                ("units", "metric"),
                ("lang", self.language.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        debug!(http_status = %status, cod = ?parsed.cod, "OpenWeather replied");

        Ok(CurrentWeatherReply {
            transport_ok: status.is_success(),
            status: parsed.cod,
            message: parsed.message.clone().filter(|m| !m.trim().is_empty()),
            weather: parsed.into_current_weather(),
        })
    }
}

/// `cod` arrives as `200` on success and as `"404"` on most errors.
fn status_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;

    Ok(raw.and_then(|value| match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

/// Error replies carry only `cod` and `message`, so everything else is optional.
#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default, deserialize_with = "status_code")]
    cod: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    sys: Option<OwSys>,
    #[serde(default)]
    main: Option<OwMain>,
    #[serde(default)]
    wind: Option<OwWind>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    coord: Option<OwCoord>,
    #[serde(default)]
    timezone: Option<i64>,
}

impl OwCurrentResponse {
    fn into_current_weather(self) -> Option<CurrentWeather> {
        let main = self.main?;
        let coord = self.coord?;
        let timezone = self.timezone?;
        let condition = self.weather.into_iter().next();

        Some(CurrentWeather {
            city_name: self.name.unwrap_or_default(),
            country_code: self.sys.map(|s| s.country).unwrap_or_default(),
            temp_c: main.temp,
            feels_like_c: main.feels_like,
            humidity_pct: main.humidity,
            wind_speed_kmh: self
                .wind
                .map(|w| round_half_up(w.speed * MPS_TO_KMH) as i64)
                .unwrap_or(0),
            condition_main: condition.as_ref().map(|c| c.main.clone()).unwrap_or_default(),
            condition_description: condition.map(|c| c.description).unwrap_or_default(),
            latitude: coord.lat,
            longitude: coord.lon,
            timezone_offset_seconds: timezone,
        })
    }
}
