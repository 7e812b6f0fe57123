use raincard_core::{RainHourView, Theme, ViewModel, round_half_up};

pub fn loading_line(city: &str) -> String {
    format!("Searching weather for {}...", city.trim())
}

fn theme_icon(theme: Theme) -> &'static str {
    match theme {
        Theme::Sunny => "☀",
        Theme::Cloudy => "☁",
        Theme::Rainy => "☂",
    }
}

/// Plain-text weather card.
pub fn card(view: &ViewModel) -> String {
    let current = &view.current;

    let mut out = format!(
        "{} {}, {}  [{}]\n{}°C\n{}\nFeels like: {}°C | Humidity: {}% | Wind: {} km/h\n",
        theme_icon(view.theme),
        current.city_name,
        current.country_code,
        view.theme,
        round_half_up(current.temp_c),
        current.condition_description,
        round_half_up(current.feels_like_c),
        current.humidity_pct,
        current.wind_speed_kmh,
    );

    if !view.remaining_hours.is_empty() {
        out.push_str("\nChance of rain by hour\n");
        for hour in &view.remaining_hours {
            out.push_str(&hour_line(hour));
        }
    }

    out
}

fn hour_line(hour: &RainHourView) -> String {
    let chance = hour
        .chance_pct
        .map(|c| format!("{c}%"))
        .unwrap_or_else(|| "--".to_string());
    let marker = if hour.high_chance { " *" } else { "" };
    format!("  {}  {:>4}{}\n", hour.label(), chance, marker)
}
