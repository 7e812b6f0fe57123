use std::collections::HashMap;

use crate::model::{HourlyRainSlot, round_half_up};

pub const HOURS_PER_DAY: u8 = 24;

/// Spread an hourly rain series over the 24 hours of one local day.
///
/// `times` and `probabilities` are index-aligned. Hours absent from the
/// series, and values that are missing or not finite, come out as the
/// unknown marker. A repeated hour keeps its last value.
pub fn align_hourly<S: AsRef<str>>(
    times: &[S],
    probabilities: &[Option<f64>],
) -> Vec<HourlyRainSlot> {
    let mut by_hour: HashMap<u8, Option<u8>> = HashMap::new();

    for (index, time) in times.iter().enumerate() {
        let Some(hour) = hour_of(time.as_ref()) else {
            continue;
        };
        let chance = probabilities.get(index).copied().flatten().and_then(round_pct);
        by_hour.insert(hour, chance);
    }

    (0..HOURS_PER_DAY)
        .map(|hour| HourlyRainSlot {
            hour,
            chance_pct: by_hour.get(&hour).copied().flatten(),
        })
        .collect()
}

/// Up to two characters after the `T` separator, "00" when there is no time part.
fn hour_of(timestamp: &str) -> Option<u8> {
    let time = timestamp
        .split_once('T')
        .map(|(_, time)| time)
        .filter(|time| !time.is_empty())
        .unwrap_or("00:00");

    // A bare "T9" still names hour 9; "T9:00" does not parse.
    let head: String = time.chars().take(2).collect();
    let hour: u8 = head.parse().ok()?;
    (hour < HOURS_PER_DAY).then_some(hour)
}

/// Round half up and clamp into 0..=100.
fn round_pct(value: f64) -> Option<u8> {
    if !value.is_finite() {
        return None;
    }

    Some(round_half_up(value).clamp(0.0, 100.0) as u8)
}
