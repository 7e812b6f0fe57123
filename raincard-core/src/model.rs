use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// A validated city lookup. The name is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    city_name: String,
}

impl WeatherQuery {
    pub fn parse(city_name: &str) -> Result<Self, QueryError> {
        let trimmed = city_name.trim();
        if trimmed.is_empty() {
            return Err(QueryError::EmptyInput);
        }

        Ok(Self { city_name: trimmed.to_string() })
    }

    pub fn city_name(&self) -> &str {
        &self.city_name
    }
}

/// Normalized current conditions for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city_name: String,
    pub country_code: String,
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_kmh: i64,
    pub condition_main: String,
    pub condition_description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone_offset_seconds: i64,
}

/// Rain probability for one hour of the city's local day.
///
/// `chance_pct == None` is the unknown marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRainSlot {
    pub hour: u8,
    pub chance_pct: Option<u8>,
}

/// Successful result of a query: current conditions plus the hourly series.
///
/// `hourly_rain` is either 24 slots or empty when the forecast was unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    pub hourly_rain: Vec<HourlyRainSlot>,
}

/// Round to the nearest integer, halves towards positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
