use serde::{Deserialize, Serialize};

/// Visual theme of a weather card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Sunny,
    Cloudy,
    Rainy,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Sunny => "sunny",
            Theme::Cloudy => "cloudy",
            Theme::Rainy => "rainy",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rain chance (percent) at which the card turns rainy regardless of condition.
pub const RAINY_THRESHOLD_PCT: f64 = 50.0;

const RAINY_CONDITIONS: &[&str] = &["rain", "drizzle", "thunderstorm"];

const CLOUDY_CONDITIONS: &[&str] = &[
    "clouds", "mist", "fog", "haze", "smoke", "dust", "sand", "ash", "squall", "tornado",
];

/// Pick a theme from the coarse condition and the peak upcoming rain chance.
pub fn classify_theme(condition_main: &str, max_rain_chance_pct: f64) -> Theme {
    let condition = condition_main.to_lowercase();

    if max_rain_chance_pct >= RAINY_THRESHOLD_PCT || RAINY_CONDITIONS.contains(&condition.as_str())
    {
        return Theme::Rainy;
    }

    if CLOUDY_CONDITIONS.contains(&condition.as_str()) {
        return Theme::Cloudy;
    }

    Theme::Sunny
}
