use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    localtime::resolve_local_date_and_hour,
    model::{CurrentWeather, HourlyRainSlot, WeatherReport},
    theme::{RAINY_THRESHOLD_PCT, Theme, classify_theme},
};

/// One upcoming hour as presented on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RainHourView {
    pub hour: u8,
    pub chance_pct: Option<u8>,
    pub high_chance: bool,
}

impl RainHourView {
    /// `HH:00`
    pub fn label(&self) -> String {
        format!("{:02}:00", self.hour)
    }
}

/// Everything a front end needs to draw a weather card.
///
/// Derived from a report and an instant every time it is needed; the
/// remaining hours move as the clock does.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub current: CurrentWeather,
    pub hourly_rain: Vec<HourlyRainSlot>,
    pub local_hour: Option<u8>,
    pub remaining_hours: Vec<RainHourView>,
    pub max_rain_chance_pct: u8,
    pub theme: Theme,
}

impl ViewModel {
    pub fn derive(report: &WeatherReport, now: DateTime<Utc>) -> Self {
        let local_hour =
            resolve_local_date_and_hour(now.timestamp(), report.current.timezone_offset_seconds)
                .map(|local| local.hour);

        let remaining_hours: Vec<RainHourView> = match local_hour {
            Some(current_hour) => report
                .hourly_rain
                .iter()
                .filter(|slot| slot.hour >= current_hour)
                .map(|slot| RainHourView {
                    hour: slot.hour,
                    chance_pct: slot.chance_pct,
                    high_chance: slot
                        .chance_pct
                        .is_some_and(|c| f64::from(c) >= RAINY_THRESHOLD_PCT),
                })
                .collect(),
            None => Vec::new(),
        };

        let max_rain_chance_pct = remaining_hours
            .iter()
            .filter_map(|h| h.chance_pct)
            .fold(0, u8::max);

        let theme = classify_theme(&report.current.condition_main, f64::from(max_rain_chance_pct));

        Self {
            current: report.current.clone(),
            hourly_rain: report.hourly_rain.clone(),
            local_hour,
            remaining_hours,
            max_rain_chance_pct,
            theme,
        }
    }
}
