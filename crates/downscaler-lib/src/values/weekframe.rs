//! Weekday ranges with week wraparound

use crate::errors::ValueError;
use chrono::Weekday;
use std::fmt;
use std::str::FromStr;

/// An inclusive weekday range, wrapping across the week boundary when the
/// start day is ordered after the end day (e.g. "Sat-Sun", "Fri-Mon").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekFrame {
    pub from: Weekday,
    pub to: Weekday,
}

impl WeekFrame {
    /// Both bounds are fully included.
    pub fn contains(&self, day: Weekday) -> bool {
        let day = ordinal(day);
        let from = ordinal(self.from);
        let to = ordinal(self.to);

        if from <= to {
            from <= day && day <= to
        } else {
            day >= from || day <= to
        }
    }
}

// Sunday-first ordering, matching the annotation grammar.
fn ordinal(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

pub(crate) fn parse_weekday(raw: &str) -> Result<Weekday, ValueError> {
    match raw.to_ascii_lowercase().as_str() {
        "sun" => Ok(Weekday::Sun),
        "mon" => Ok(Weekday::Mon),
        "tue" => Ok(Weekday::Tue),
        "wed" => Ok(Weekday::Wed),
        "thu" => Ok(Weekday::Thu),
        "fri" => Ok(Weekday::Fri),
        "sat" => Ok(Weekday::Sat),
        _ => Err(ValueError::InvalidWeekday(raw.to_string())),
    }
}

pub(crate) fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

impl FromStr for WeekFrame {
    type Err = ValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (from_raw, to_raw) = raw
            .split_once('-')
            .ok_or_else(|| ValueError::InvalidWeekFrame(raw.to_string()))?;

        Ok(WeekFrame {
            from: parse_weekday(from_raw)?,
            to: parse_weekday(to_raw)?,
        })
    }
}

impl fmt::Display for WeekFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", weekday_abbrev(self.from), weekday_abbrev(self.to))
    }
}
