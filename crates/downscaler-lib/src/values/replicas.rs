//! Downscale replica targets

use crate::errors::ValueError;
use std::fmt;
use std::str::FromStr;

/// The replica target applied while a workload is in its down state.
///
/// Percentages are parsed and validated here but resolved against the
/// workload's actual replica count by the mutation side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replicas {
    /// A fixed replica count, never negative.
    Absolute(i32),
    /// A percentage of the current replica count, 0-100.
    Percentage(u8),
}

impl Replicas {
    pub fn as_absolute(self) -> Option<i32> {
        match self {
            Replicas::Absolute(count) => Some(count),
            Replicas::Percentage(_) => None,
        }
    }

    pub fn as_percentage(self) -> Option<u8> {
        match self {
            Replicas::Absolute(_) => None,
            Replicas::Percentage(percent) => Some(percent),
        }
    }
}

impl FromStr for Replicas {
    type Err = ValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim();

        if let Some(stripped) = text.strip_suffix('%') {
            let percent: i32 = stripped.parse().map_err(|_| ValueError::InvalidReplicas {
                value: raw.to_string(),
                reason: "percentage is not a number",
            })?;
            if !(0..=100).contains(&percent) {
                return Err(ValueError::InvalidReplicas {
                    value: raw.to_string(),
                    reason: "percentage must be between 0% and 100%",
                });
            }
            return Ok(Replicas::Percentage(percent as u8));
        }

        let count: i32 = text.parse().map_err(|_| ValueError::InvalidReplicas {
            value: raw.to_string(),
            reason: "not a number",
        })?;
        if count < 0 {
            return Err(ValueError::InvalidReplicas {
                value: raw.to_string(),
                reason: "replica count must not be negative",
            });
        }
        Ok(Replicas::Absolute(count))
    }
}

impl fmt::Display for Replicas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replicas::Absolute(count) => write!(f, "{count}"),
            Replicas::Percentage(percent) => write!(f, "{percent}%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_absolute_counts() {
        assert_eq!("0".parse::<Replicas>().unwrap(), Replicas::Absolute(0));
        assert_eq!("3".parse::<Replicas>().unwrap(), Replicas::Absolute(3));
        assert!("-1".parse::<Replicas>().is_err());
        assert!("two".parse::<Replicas>().is_err());
    }

    #[test]
    fn parses_percentages_within_bounds() {
        assert_eq!("0%".parse::<Replicas>().unwrap(), Replicas::Percentage(0));
        assert_eq!("100%".parse::<Replicas>().unwrap(), Replicas::Percentage(100));
        assert!("101%".parse::<Replicas>().is_err());
        assert!("-5%".parse::<Replicas>().is_err());
        assert!("x%".parse::<Replicas>().is_err());
    }

    #[test]
    fn canonical_string_forms() {
        assert_eq!(Replicas::Absolute(2).to_string(), "2");
        assert_eq!(Replicas::Percentage(50).to_string(), "50%");
    }

    #[test]
    fn accessors_match_the_variant() {
        assert_eq!(Replicas::Absolute(2).as_absolute(), Some(2));
        assert_eq!(Replicas::Absolute(2).as_percentage(), None);
        assert_eq!(Replicas::Percentage(50).as_percentage(), Some(50));
        assert_eq!(Replicas::Percentage(50).as_absolute(), None);
    }
}
