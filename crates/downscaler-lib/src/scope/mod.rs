//! Configuration scopes
//!
//! A [`Scope`] is one layer of configuration (workload annotations,
//! namespace annotations, CLI flags, environment variables, or the built-in
//! defaults). Every field is optional so the resolver can distinguish "not
//! configured on this layer" from "configured to the empty/false state".

pub mod parser;
pub mod resolver;

use crate::errors::{ResolveError, ScopeError};
use crate::values::{Replicas, TimeSpanSet, TriStateBool, WeekFrame};
use chrono::{DateTime, Utc, Weekday};
use chrono_tz::Tz;
use std::time::Duration;

/// One configuration layer. Constructed fresh per evaluation for the
/// workload and namespace layers, once per process for CLI/env, and once
/// ever for the defaults; never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Periods to scale down in; outside of them the scope abstains.
    pub downscale_period: Option<TimeSpanSet>,
    /// Inside these spans workloads are scaled down, outside scaled up.
    pub downtime: Option<TimeSpanSet>,
    /// Periods to scale up in; outside of them the scope abstains.
    pub upscale_period: Option<TimeSpanSet>,
    /// Inside these spans workloads are scaled up, outside scaled down.
    pub uptime: Option<TimeSpanSet>,
    /// Spans during which the workload is excluded from scaling entirely.
    pub exclude: Option<TimeSpanSet>,
    /// Deadline until which the workload is excluded.
    pub exclude_until: Option<DateTime<Utc>>,
    /// Spans forcing an uptime state, overriding windowed scaling.
    pub force_uptime: Option<TimeSpanSet>,
    /// Spans forcing a downtime state, overriding windowed scaling.
    pub force_downtime: Option<TimeSpanSet>,
    /// Replica target while scaled down.
    pub downscale_replicas: Option<Replicas>,
    /// Delay after workload creation during which downscaling is suppressed.
    pub grace_period: Option<Duration>,
    /// Whether scaling a workload immediately scales its children too.
    pub scale_children: TriStateBool,
    /// Whether excluded workloads are still processed for upscaling.
    pub upscale_excluded: TriStateBool,
    /// Timezone for relative spans that omit one.
    pub default_timezone: Option<Tz>,
    /// Weekday range for relative spans that omit one.
    pub default_week_frame: Option<WeekFrame>,
}

impl Scope {
    /// A scope with every field unset.
    pub fn new() -> Scope {
        Scope::default()
    }

    /// The process-wide fallback scope: constructed once at startup, shared
    /// read-only, and the only scope guaranteed to answer every resolver
    /// query. Baseline is "never downscale".
    pub fn default_scope() -> Scope {
        Scope {
            downtime: Some(TimeSpanSet::never()),
            downscale_replicas: Some(Replicas::Absolute(0)),
            grace_period: Some(Duration::from_secs(15 * 60)),
            scale_children: TriStateBool::False,
            upscale_excluded: TriStateBool::False,
            default_timezone: Some(chrono_tz::UTC),
            default_week_frame: Some(WeekFrame {
                from: Weekday::Mon,
                to: Weekday::Sun,
            }),
            ..Scope::default()
        }
    }

    /// Checks the mutually exclusive field pairs within this scope:
    /// `uptime`+`downtime`, and either of those with a scaling period.
    /// Both offending field names are reported.
    pub fn check_for_incompatible_fields(&self) -> Result<(), ScopeError> {
        if self.uptime.is_some() && self.downtime.is_some() {
            return Err(ScopeError::IncompatibleFields {
                left: "uptime",
                right: "downtime",
            });
        }

        let window = if self.uptime.is_some() {
            Some("uptime")
        } else if self.downtime.is_some() {
            Some("downtime")
        } else {
            None
        };
        let period = if self.upscale_period.is_some() {
            Some("upscale-period")
        } else if self.downscale_period.is_some() {
            Some("downscale-period")
        } else {
            None
        };
        if let (Some(left), Some(right)) = (window, period) {
            return Err(ScopeError::IncompatibleFields { left, right });
        }

        Ok(())
    }

    /// Startup validation for the fallback scope. A default scope that
    /// cannot answer every query turns per-workload resolution into
    /// `ValueNotSet` errors, which is a deployment bug.
    pub fn validate_default(&self) -> Result<(), ResolveError> {
        if !self.defines_scaling() && !self.defines_force_fields() {
            return Err(ResolveError::ValueNotSet("a scaling baseline"));
        }
        if self.downscale_replicas.is_none() {
            return Err(ResolveError::ValueNotSet("downscale-replicas"));
        }
        if self.default_timezone.is_none() {
            return Err(ResolveError::ValueNotSet("a default timezone"));
        }
        Ok(())
    }

    pub(crate) fn defines_force_fields(&self) -> bool {
        self.force_downtime.is_some() || self.force_uptime.is_some()
    }

    pub(crate) fn defines_scaling(&self) -> bool {
        self.downtime.is_some()
            || self.uptime.is_some()
            || self.downscale_period.is_some()
            || self.upscale_period.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_scope_is_compatible() {
        assert!(Scope::new().check_for_incompatible_fields().is_ok());
    }

    #[test]
    fn uptime_and_downtime_conflict() {
        let scope = Scope {
            uptime: Some(TimeSpanSet::always()),
            downtime: Some(TimeSpanSet::never()),
            ..Scope::default()
        };
        assert_eq!(
            scope.check_for_incompatible_fields(),
            Err(ScopeError::IncompatibleFields {
                left: "uptime",
                right: "downtime",
            })
        );
    }

    #[test]
    fn window_and_period_conflict_regardless_of_activity() {
        // both spans inactive, still incompatible
        let scope = Scope {
            uptime: Some(TimeSpanSet::never()),
            downscale_period: Some(TimeSpanSet::never()),
            ..Scope::default()
        };
        assert_eq!(
            scope.check_for_incompatible_fields(),
            Err(ScopeError::IncompatibleFields {
                left: "uptime",
                right: "downscale-period",
            })
        );

        let scope = Scope {
            downtime: Some(TimeSpanSet::always()),
            upscale_period: Some(TimeSpanSet::always()),
            ..Scope::default()
        };
        assert_eq!(
            scope.check_for_incompatible_fields(),
            Err(ScopeError::IncompatibleFields {
                left: "downtime",
                right: "upscale-period",
            })
        );
    }

    #[test]
    fn periods_alone_are_compatible() {
        let scope = Scope {
            downscale_period: Some(TimeSpanSet::always()),
            upscale_period: Some(TimeSpanSet::never()),
            ..Scope::default()
        };
        assert!(scope.check_for_incompatible_fields().is_ok());
    }

    #[test]
    fn built_in_default_scope_is_valid() {
        let scope = Scope::default_scope();
        assert!(scope.validate_default().is_ok());
        assert!(scope.check_for_incompatible_fields().is_ok());
    }

    #[test]
    fn misconstructed_default_scope_fails_validation() {
        let scope = Scope::new();
        assert!(matches!(
            scope.validate_default(),
            Err(ResolveError::ValueNotSet(_))
        ));

        let scope = Scope {
            downtime: Some(TimeSpanSet::never()),
            ..Scope::default()
        };
        assert_eq!(
            scope.validate_default(),
            Err(ResolveError::ValueNotSet("downscale-replicas"))
        );
    }
}
