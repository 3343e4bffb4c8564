//! Timespan grammar and evaluation
//!
//! A timespan set is a comma-separated list; each element is either a
//! boolean literal ("always"/"never"), an absolute window between two
//! RFC3339 timestamps, or a weekly-recurring relative window.

use crate::errors::{EvalError, ValueError};
use crate::values::daytime::DayTime;
use crate::values::weekframe::WeekFrame;
use chrono::{DateTime, Datelike, Utc, Weekday};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

// Anchors each side on the RFC3339 offset suffix; splitting on a bare '-'
// would break on the dashes inside the dates themselves.
static ABSOLUTE_TIME_SPAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+Z|.+[+-]\d{2}:\d{2}) *- *(.+Z|.+[+-]\d{2}:\d{2})$")
        .expect("hardcoded regex")
});

/// Defaults supplied by the scope chain when a relative span omits its
/// timezone or weekday range.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalContext {
    pub timezone: Option<Tz>,
    pub week_frame: Option<WeekFrame>,
}

/// A single window during which a condition (downtime, uptime, exclusion,
/// force state) holds.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeSpan {
    /// Statically always or never active.
    Boolean(bool),
    /// Fixed window between two timestamps, `from` inclusive, `to` exclusive.
    Absolute {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    /// Weekly-recurring window.
    Relative(RelativeTimeSpan),
}

/// Weekly-recurring window: weekday range AND minute-of-day range, both
/// wrapping when their `from` bound is ordered after their `to` bound.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeTimeSpan {
    /// None falls back to the evaluation context's default timezone.
    pub timezone: Option<Tz>,
    /// None falls back to the context's default week frame, or every day.
    pub week_frame: Option<WeekFrame>,
    pub time_from: DayTime,
    pub time_to: DayTime,
}

impl TimeSpan {
    pub fn is_active_at(
        &self,
        instant: DateTime<Utc>,
        ctx: &EvalContext,
    ) -> Result<bool, EvalError> {
        match self {
            TimeSpan::Boolean(active) => Ok(*active),
            TimeSpan::Absolute { from, to } => Ok(*from <= instant && instant < *to),
            TimeSpan::Relative(span) => span.is_active_at(instant, ctx),
        }
    }
}

impl RelativeTimeSpan {
    pub fn is_active_at(
        &self,
        instant: DateTime<Utc>,
        ctx: &EvalContext,
    ) -> Result<bool, EvalError> {
        let timezone = self
            .timezone
            .or(ctx.timezone)
            .ok_or(EvalError::MissingTimezone)?;
        let local = instant.with_timezone(&timezone);

        Ok(self.time_of_day_in_range(DayTime::of(&local))
            && self.weekday_in_range(local.weekday(), ctx))
    }

    fn weekday_in_range(&self, day: Weekday, ctx: &EvalContext) -> bool {
        match self.week_frame.or(ctx.week_frame) {
            Some(frame) => frame.contains(day),
            // no frame configured anywhere: active on every day
            None => true,
        }
    }

    fn time_of_day_in_range(&self, time: DayTime) -> bool {
        if self.time_from <= self.time_to {
            self.time_from <= time && time < self.time_to
        } else {
            // wraps past midnight
            time >= self.time_from || time < self.time_to
        }
    }
}

impl FromStr for TimeSpan {
    type Err = ValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim();

        match text.to_ascii_lowercase().as_str() {
            "always" | "true" => return Ok(TimeSpan::Boolean(true)),
            "never" | "false" => return Ok(TimeSpan::Boolean(false)),
            _ => {}
        }

        if let Some(captures) = ABSOLUTE_TIME_SPAN_RE.captures(text) {
            return parse_absolute(&captures);
        }

        parse_relative(text).map(TimeSpan::Relative)
    }
}

fn parse_absolute(captures: &regex::Captures<'_>) -> Result<TimeSpan, ValueError> {
    let from_raw = captures[1].trim().to_string();
    let to_raw = captures[2].trim().to_string();

    let from = DateTime::parse_from_rfc3339(&from_raw)
        .map_err(|_| ValueError::InvalidRfc3339 {
            side: "from",
            value: from_raw,
        })?
        .with_timezone(&Utc);
    let to = DateTime::parse_from_rfc3339(&to_raw)
        .map_err(|_| ValueError::InvalidRfc3339 {
            side: "to",
            value: to_raw,
        })?
        .with_timezone(&Utc);

    Ok(TimeSpan::Absolute { from, to })
}

fn parse_relative(text: &str) -> Result<RelativeTimeSpan, ValueError> {
    let invalid = || ValueError::InvalidRelativeTimeSpan(text.to_string());
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() > 3 {
        return Err(invalid());
    }

    // the time-of-day range is the token containing ':'; the weekday prefix
    // and the timezone suffix are both optional
    let (week_frame, rest) = if tokens[0].contains(':') {
        (None, &tokens[..])
    } else {
        (Some(tokens[0].parse::<WeekFrame>()?), &tokens[1..])
    };

    let (time_range, timezone) = match rest {
        [time] => (*time, None),
        [time, tz] => (*time, Some(parse_timezone(tz)?)),
        _ => return Err(invalid()),
    };

    let (from_raw, to_raw) = split_time_range(time_range).ok_or_else(invalid)?;

    Ok(RelativeTimeSpan {
        timezone,
        week_frame,
        time_from: DayTime::parse(from_raw)?,
        time_to: DayTime::parse(to_raw)?,
    })
}

fn parse_timezone(raw: &str) -> Result<Tz, ValueError> {
    raw.parse::<Tz>()
        .map_err(|_| ValueError::InvalidTimezone(raw.to_string()))
}

fn split_time_range(raw: &str) -> Option<(&str, &str)> {
    let mut parts = raw.split('-');
    let from = parts.next()?;
    let to = parts.next()?;
    if parts.next().is_some() || from.is_empty() || to.is_empty() {
        return None;
    }
    Some((from, to))
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSpan::Boolean(true) => write!(f, "always"),
            TimeSpan::Boolean(false) => write!(f, "never"),
            TimeSpan::Absolute { from, to } => write!(
                f,
                "{} - {}",
                from.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
                to.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            ),
            TimeSpan::Relative(span) => {
                if let Some(frame) = span.week_frame {
                    write!(f, "{frame} ")?;
                }
                write!(f, "{}-{}", span.time_from, span.time_to)?;
                if let Some(timezone) = span.timezone {
                    write!(f, " {}", timezone.name())?;
                }
                Ok(())
            }
        }
    }
}

/// Ordered collection of timespans with union semantics: an instant is
/// contained if any member span is active at it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSpanSet(Vec<TimeSpan>);

impl TimeSpanSet {
    pub fn always() -> Self {
        TimeSpanSet(vec![TimeSpan::Boolean(true)])
    }

    pub fn never() -> Self {
        TimeSpanSet(vec![TimeSpan::Boolean(false)])
    }

    pub fn spans(&self) -> &[TimeSpan] {
        &self.0
    }

    pub fn contains(
        &self,
        instant: DateTime<Utc>,
        ctx: &EvalContext,
    ) -> Result<bool, EvalError> {
        for span in &self.0 {
            if span.is_active_at(instant, ctx)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl From<Vec<TimeSpan>> for TimeSpanSet {
    fn from(spans: Vec<TimeSpan>) -> Self {
        TimeSpanSet(spans)
    }
}

impl FromStr for TimeSpanSet {
    type Err = ValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.split(',')
            .map(|element| element.parse())
            .collect::<Result<Vec<TimeSpan>, ValueError>>()
            .map(TimeSpanSet)
    }
}

impl fmt::Display for TimeSpanSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, span) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{span}")?;
        }
        Ok(())
    }
}
