//! Error taxonomy for the configuration engine
//!
//! Parse failures always carry the raw value that was rejected; the scope
//! builders additionally attach the annotation/flag key so callers can point
//! at the exact configuration line that is wrong.

use thiserror::Error;

/// A single raw value failed to parse. No key context at this level; the
/// scope builders wrap this into [`ScopeError::Parse`] with the key attached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("invalid boolean {0:?}")]
    InvalidBool(String),

    #[error("invalid weekday {0:?}, expected a three letter abbreviation like \"Mon\"")]
    InvalidWeekday(String),

    #[error("invalid week frame {0:?}, expected \"<weekdayFrom>-<weekdayTo>\"")]
    InvalidWeekFrame(String),

    #[error("invalid time of day {0:?}, expected \"HH:MM\"")]
    InvalidTimeOfDay(String),

    #[error("time of day {0:?} is out of range, hour must be 0-24 and minute 0-59")]
    TimeOfDayOutOfRange(String),

    #[error("invalid timezone {0:?}, expected an IANA timezone name")]
    InvalidTimezone(String),

    #[error("failed to parse {side} side of absolute timespan as RFC3339: {value:?}")]
    InvalidRfc3339 { side: &'static str, value: String },

    #[error("invalid relative timespan {0:?}, expected \"[<Wday>-<Wday>] <HH:MM>-<HH:MM> [<timezone>]\"")]
    InvalidRelativeTimeSpan(String),

    #[error("invalid replicas {value:?}: {reason}")]
    InvalidReplicas { value: String, reason: &'static str },

    #[error("invalid duration {0:?}, expected plain seconds or a value like \"1h30m\"")]
    InvalidDuration(String),

    #[error("invalid timestamp {0:?}, expected RFC3339")]
    InvalidTimestamp(String),
}

/// Assembling one configuration scope failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// A configured value failed to parse. Names the offending key and the
    /// raw value it carried.
    #[error("failed to parse {key:?} (value {value:?}): {source}")]
    Parse {
        key: String,
        value: String,
        source: ValueError,
    },

    /// Two mutually exclusive fields were both configured in the same scope.
    #[error("incompatible fields: {left:?} and {right:?} may not be combined")]
    IncompatibleFields {
        left: &'static str,
        right: &'static str,
    },
}

/// The precedence resolver could not produce an answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No scope defines the requested value. The default scope is supposed to
    /// answer every query, so this is a deployment bug, not a workload bug.
    #[error("no scope defines {0}, the default scope is misconfigured")]
    ValueNotSet(&'static str),

    /// The grace-period time annotation was present but not valid RFC3339.
    #[error("failed to parse {key:?} annotation as RFC3339 timestamp (value {value:?})")]
    InvalidTimeAnnotation { key: String, value: String },
}

/// A timespan could not be evaluated against an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A relative span has no timezone of its own and no scope supplies a
    /// default one.
    #[error("relative timespan has no timezone and no default timezone is configured")]
    MissingTimezone,
}
