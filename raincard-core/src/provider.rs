use std::fmt::Debug;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::CurrentWeather;

pub mod openmeteo;
pub mod openweather;

/// What the current-weather provider said, before any interpretation.
///
/// `status` is the body-level status code, already normalized from whatever
/// shape the provider used. `transport_ok` is the HTTP layer's own verdict;
/// the two can disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeatherReply {
    pub transport_ok: bool,
    pub status: Option<i64>,
    pub message: Option<String>,
    pub weather: Option<CurrentWeather>,
}

/// Raw hourly rain series for one local day, index-aligned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub precipitation_probability: Vec<Option<f64>>,
}

#[async_trait]
pub trait CurrentWeatherProvider: Send + Sync + Debug {
    /// Look up current conditions for `city`. `Err` means no usable reply at
    /// all (connection failure, unreadable body).
    async fn fetch_current(&self, city: &str, credential: &str)
    -> anyhow::Result<CurrentWeatherReply>;
}

#[async_trait]
pub trait HourlyForecastProvider: Send + Sync + Debug {
    /// Hourly rain probability at a location for a single local date.
    async fn fetch_hourly(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> anyhow::Result<HourlySeries>;
}

/// Shorten a response body for error messages.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// `abcd...wxyz`; short keys are hidden entirely.
pub fn mask_credential(credential: &str) -> String {
    let chars: Vec<char> = credential.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
