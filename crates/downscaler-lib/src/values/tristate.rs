//! Booleans that remember whether they were configured at all

use crate::errors::ValueError;
use std::fmt;
use std::str::FromStr;

/// A boolean with an explicit "not configured" state.
///
/// The resolver needs the distinction because an explicit `false` in a
/// higher-precedence scope must win over a lower-precedence `true`, while
/// `Unset` falls through to the next scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriStateBool {
    #[default]
    Unset,
    False,
    True,
}

impl TriStateBool {
    pub fn is_set(self) -> bool {
        !matches!(self, TriStateBool::Unset)
    }

    /// The configured value, if one was configured.
    pub fn value(self) -> Option<bool> {
        match self {
            TriStateBool::Unset => None,
            TriStateBool::False => Some(false),
            TriStateBool::True => Some(true),
        }
    }
}

impl From<bool> for TriStateBool {
    fn from(value: bool) -> Self {
        if value {
            TriStateBool::True
        } else {
            TriStateBool::False
        }
    }
}

impl FromStr for TriStateBool {
    type Err = ValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(TriStateBool::True),
            "false" | "0" => Ok(TriStateBool::False),
            _ => Err(ValueError::InvalidBool(raw.to_string())),
        }
    }
}

impl fmt::Display for TriStateBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriStateBool::Unset => write!(f, "undefined"),
            TriStateBool::False => write!(f, "false"),
            TriStateBool::True => write!(f, "true"),
        }
    }
}
