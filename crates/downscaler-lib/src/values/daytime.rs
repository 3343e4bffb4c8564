//! Minute-of-day arithmetic for relative timespans

use crate::errors::ValueError;
use chrono::Timelike;
use std::fmt;

pub const MINUTES_PER_HOUR: u16 = 60;
pub const MINUTES_PER_DAY: u16 = 24 * MINUTES_PER_HOUR;

/// A time of day measured in minutes since midnight.
///
/// 24:00 is allowed as an end-of-day sentinel so that "00:00-24:00" can
/// describe a full day; an instant extracted from a clock is always below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DayTime(u16);

impl DayTime {
    pub const MIDNIGHT: DayTime = DayTime(0);
    pub const END_OF_DAY: DayTime = DayTime(MINUTES_PER_DAY);

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Extracts the minute-of-day of an instant, in the instant's timezone.
    pub fn of<Tz: chrono::TimeZone>(instant: &chrono::DateTime<Tz>) -> DayTime {
        DayTime(instant.hour() as u16 * MINUTES_PER_HOUR + instant.minute() as u16)
    }

    /// Parses an "HH:MM" string. Hour 24 is only valid as "24:00".
    pub fn parse(raw: &str) -> Result<DayTime, ValueError> {
        let (hour_raw, minute_raw) = raw
            .split_once(':')
            .ok_or_else(|| ValueError::InvalidTimeOfDay(raw.to_string()))?;

        let hour: u16 = hour_raw
            .parse()
            .map_err(|_| ValueError::InvalidTimeOfDay(raw.to_string()))?;
        let minute: u16 = minute_raw
            .parse()
            .map_err(|_| ValueError::InvalidTimeOfDay(raw.to_string()))?;

        if hour > 24 || minute > 59 || (hour == 24 && minute != 0) {
            return Err(ValueError::TimeOfDayOutOfRange(raw.to_string()));
        }

        Ok(DayTime(hour * MINUTES_PER_HOUR + minute))
    }
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}",
            self.0 / MINUTES_PER_HOUR,
            self.0 % MINUTES_PER_HOUR
        )
    }
}
