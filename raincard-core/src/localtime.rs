use chrono::{DateTime, NaiveDate, Timelike};

/// Calendar date and hour of day at a city's wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDateHour {
    pub date: NaiveDate,
    pub hour: u8,
}

impl LocalDateHour {
    /// `YYYY-MM-DD`, month and day zero-padded.
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Shift a unix timestamp by a UTC offset and read the result as UTC.
///
/// Reading the shifted instant as UTC keeps the host timezone out of the
/// calculation. The offset is not range-checked; `None` only when the sum
/// leaves the representable calendar.
pub fn resolve_local_date_and_hour(
    unix_seconds: i64,
    timezone_offset_seconds: i64,
) -> Option<LocalDateHour> {
    let local = unix_seconds.checked_add(timezone_offset_seconds)?;
    let dt = DateTime::from_timestamp(local, 0)?;

    Some(LocalDateHour {
        date: dt.date_naive(),
        hour: dt.hour() as u8,
    })
}
