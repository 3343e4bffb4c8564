//! Layered precedence resolution
//!
//! [`Scopes`] stacks the five configuration layers in precedence order and
//! answers every per-workload question by scanning from the most specific
//! layer down: the first scope that defines a value decides it, and lower
//! scopes are never consulted for that value.

use crate::errors::{EvalError, ResolveError};
use crate::logging::ResourceLogger;
use crate::scope::Scope;
use crate::values::{EvalContext, Replicas, TimeSpanSet};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

pub const SCOPE_COUNT: usize = 5;

/// Identifies one layer of the stack, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeId {
    Workload,
    Namespace,
    Cli,
    Environment,
    Default,
}

impl ScopeId {
    pub const ALL: [ScopeId; SCOPE_COUNT] = [
        ScopeId::Workload,
        ScopeId::Namespace,
        ScopeId::Cli,
        ScopeId::Environment,
        ScopeId::Default,
    ];
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeId::Workload => write!(f, "workload"),
            ScopeId::Namespace => write!(f, "namespace"),
            ScopeId::Cli => write!(f, "CLI"),
            ScopeId::Environment => write!(f, "environment"),
            ScopeId::Default => write!(f, "default"),
        }
    }
}

/// The scaling state a workload should be in at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scaling {
    /// No scope configures any scaling; leave the workload alone.
    None,
    /// The deciding scope abstains at this instant.
    Ignore,
    Down,
    Up,
    /// Conflicting windows are simultaneously active in the deciding scope.
    Multiple,
    /// A span could not be evaluated, usually a missing timezone.
    Incomplete,
}

impl fmt::Display for Scaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scaling::None => write!(f, "none"),
            Scaling::Ignore => write!(f, "ignore"),
            Scaling::Down => write!(f, "down"),
            Scaling::Up => write!(f, "up"),
            Scaling::Multiple => write!(f, "multiple"),
            Scaling::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// The five configuration layers of one workload, in precedence order.
///
/// Borrowed rather than owned: the CLI, environment, and default scopes are
/// built once per process and shared across every workload evaluation.
#[derive(Debug, Clone, Copy)]
pub struct Scopes<'a> {
    scopes: [&'a Scope; SCOPE_COUNT],
}

impl<'a> Scopes<'a> {
    pub fn new(
        workload: &'a Scope,
        namespace: &'a Scope,
        cli: &'a Scope,
        environment: &'a Scope,
        default: &'a Scope,
    ) -> Scopes<'a> {
        Scopes {
            scopes: [workload, namespace, cli, environment, default],
        }
    }

    pub fn get(&self, id: ScopeId) -> &'a Scope {
        match id {
            ScopeId::Workload => self.scopes[0],
            ScopeId::Namespace => self.scopes[1],
            ScopeId::Cli => self.scopes[2],
            ScopeId::Environment => self.scopes[3],
            ScopeId::Default => self.scopes[4],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Scope> + '_ {
        self.scopes.into_iter()
    }

    /// Span-evaluation defaults, each resolved by its own first-definer scan.
    pub fn eval_context(&self) -> EvalContext {
        EvalContext {
            timezone: self.iter().find_map(|scope| scope.default_timezone),
            week_frame: self.iter().find_map(|scope| scope.default_week_frame),
        }
    }

    /// Resolves the scaling state at `now`.
    ///
    /// Force fields are checked first across all scopes; the most specific
    /// scope that configures either force field decides, even when its spans
    /// are inactive at `now`. Only when no scope configures a force field do
    /// the regular windows and periods get a say, again decided entirely by
    /// the most specific scope that configures any of them.
    pub fn current_scaling(&self, now: DateTime<Utc>) -> Scaling {
        let scaling = self.resolve_scaling(now);
        tracing::debug!(at = %now, scaling = %scaling, "resolved scaling state");
        scaling
    }

    fn resolve_scaling(&self, now: DateTime<Utc>) -> Scaling {
        let ctx = self.eval_context();

        if let Some(scope) = self.iter().find(|scope| scope.defines_force_fields()) {
            let down = set_active(&scope.force_downtime, now, &ctx);
            let up = set_active(&scope.force_uptime, now, &ctx);
            return match (down, up) {
                (Ok(true), Ok(true)) => Scaling::Multiple,
                (Ok(true), Ok(false)) => Scaling::Down,
                (Ok(false), Ok(true)) => Scaling::Up,
                (Ok(false), Ok(false)) => Scaling::Ignore,
                (Err(_), _) | (_, Err(_)) => Scaling::Incomplete,
            };
        }

        let Some(scope) = self.iter().find(|scope| scope.defines_scaling()) else {
            return Scaling::None;
        };

        // windows invert outside their spans; periods abstain outside theirs
        if let Some(downtime) = &scope.downtime {
            return match downtime.contains(now, &ctx) {
                Ok(true) => Scaling::Down,
                Ok(false) => Scaling::Up,
                Err(_) => Scaling::Incomplete,
            };
        }
        if let Some(uptime) = &scope.uptime {
            return match uptime.contains(now, &ctx) {
                Ok(true) => Scaling::Up,
                Ok(false) => Scaling::Down,
                Err(_) => Scaling::Incomplete,
            };
        }

        match (
            set_active(&scope.downscale_period, now, &ctx),
            set_active(&scope.upscale_period, now, &ctx),
        ) {
            (Ok(true), Ok(true)) => Scaling::Multiple,
            (Ok(true), Ok(false)) => Scaling::Down,
            (Ok(false), Ok(true)) => Scaling::Up,
            (Ok(false), Ok(false)) => Scaling::Ignore,
            (Err(_), _) | (_, Err(_)) => Scaling::Incomplete,
        }
    }

    /// Whether the workload is excluded from scaling at `now`. Exclusion
    /// spans and the exclusion deadline are resolved independently and
    /// either one suffices.
    pub fn excluded(&self, now: DateTime<Utc>) -> Result<bool, EvalError> {
        let ctx = self.eval_context();

        if let Some(exclude) = self.iter().find_map(|scope| scope.exclude.as_ref()) {
            if exclude.contains(now, &ctx)? {
                return Ok(true);
            }
        }
        if let Some(until) = self.iter().find_map(|scope| scope.exclude_until) {
            if now < until {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn downscale_replicas(&self) -> Result<Replicas, ResolveError> {
        self.iter()
            .find_map(|scope| scope.downscale_replicas)
            .ok_or(ResolveError::ValueNotSet("downscale-replicas"))
    }

    pub fn grace_period(&self) -> Result<Duration, ResolveError> {
        self.iter()
            .find_map(|scope| scope.grace_period)
            .ok_or(ResolveError::ValueNotSet("grace-period"))
    }

    pub fn scale_children(&self) -> bool {
        self.iter()
            .find_map(|scope| scope.scale_children.value())
            .unwrap_or(false)
    }

    pub fn upscale_excluded(&self) -> bool {
        self.iter()
            .find_map(|scope| scope.upscale_excluded.value())
            .unwrap_or(false)
    }

    /// Whether the workload is still within its grace period at `now`.
    /// No scope defining a grace period means no grace period at all.
    ///
    /// The grace period normally counts from `created_at`. When a time
    /// annotation key is configured and the workload carries it, its RFC3339
    /// value replaces `created_at`; a present but unparsable value is
    /// reported through the logger and fails the query instead of silently
    /// falling back.
    pub fn in_grace_period(
        &self,
        time_annotation: Option<&str>,
        workload_annotations: &BTreeMap<String, String>,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
        logger: &dyn ResourceLogger,
    ) -> Result<bool, ResolveError> {
        let Some(grace) = self.iter().find_map(|scope| scope.grace_period) else {
            return Ok(false);
        };

        let reference = match time_annotation.and_then(|key| {
            workload_annotations
                .get(key)
                .map(|value| (key, value.as_str()))
        }) {
            Some((key, value)) => match DateTime::parse_from_rfc3339(value) {
                Ok(parsed) => parsed.with_timezone(&Utc),
                Err(_) => {
                    let err = ResolveError::InvalidTimeAnnotation {
                        key: key.to_string(),
                        value: value.to_string(),
                    };
                    logger.invalid_annotation(key, &err.to_string());
                    return Err(err);
                }
            },
            None => created_at,
        };

        let grace = chrono::Duration::from_std(grace).unwrap_or(chrono::Duration::MAX);
        // a grace period too long to represent has not elapsed
        match reference.checked_add_signed(grace) {
            Some(deadline) => Ok(now < deadline),
            None => Ok(true),
        }
    }
}

fn set_active(
    set: &Option<TimeSpanSet>,
    now: DateTime<Utc>,
    ctx: &EvalContext,
) -> Result<bool, EvalError> {
    match set {
        Some(set) => set.contains(now, ctx),
        None => Ok(false),
    }
}
