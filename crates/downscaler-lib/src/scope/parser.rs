//! Builds scopes from annotation maps and environment variables
//!
//! Every parse failure is reported through the [`ResourceLogger`] seam with
//! the offending key and raw value before being returned, so the caller can
//! skip this one workload and keep processing the rest of the batch.

use crate::errors::{ScopeError, ValueError};
use crate::logging::ResourceLogger;
use crate::scope::Scope;
use crate::values::duration::parse_duration;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::collections::BTreeMap;
use std::str::FromStr;

pub const ANNOTATION_DOWNSCALE_PERIOD: &str = "downscaler/downscale-period";
pub const ANNOTATION_DOWNTIME: &str = "downscaler/downtime";
pub const ANNOTATION_UPSCALE_PERIOD: &str = "downscaler/upscale-period";
pub const ANNOTATION_UPTIME: &str = "downscaler/uptime";
pub const ANNOTATION_EXCLUDE: &str = "downscaler/exclude";
pub const ANNOTATION_EXCLUDE_UNTIL: &str = "downscaler/exclude-until";
pub const ANNOTATION_FORCE_UPTIME: &str = "downscaler/force-uptime";
pub const ANNOTATION_FORCE_DOWNTIME: &str = "downscaler/force-downtime";
pub const ANNOTATION_DOWNSCALE_REPLICAS: &str = "downscaler/downscale-replicas";
pub const ANNOTATION_GRACE_PERIOD: &str = "downscaler/grace-period";
pub const ANNOTATION_SCALE_CHILDREN: &str = "downscaler/scale-children";
pub const ANNOTATION_UPSCALE_EXCLUDED: &str = "downscaler/upscale-excluded";

pub const ENV_UPSCALE_PERIOD: &str = "UPSCALE_PERIOD";
pub const ENV_UPTIME: &str = "DEFAULT_UPTIME";
pub const ENV_DOWNSCALE_PERIOD: &str = "DOWNSCALE_PERIOD";
pub const ENV_DOWNTIME: &str = "DEFAULT_DOWNTIME";
pub const ENV_TIMEZONE: &str = "DEFAULT_TIMEZONE";
pub const ENV_WEEK_FRAME: &str = "DEFAULT_WEEKFRAME";

impl Scope {
    /// Builds a scope from a workload's or namespace's annotations and
    /// validates it for incompatible fields.
    pub fn from_annotations(
        annotations: &BTreeMap<String, String>,
        logger: &dyn ResourceLogger,
    ) -> Result<Scope, ScopeError> {
        let lookup = |key: &str| annotations.get(key).cloned();
        let mut scope = Scope::new();

        scope.downscale_period = parse_value(&lookup, ANNOTATION_DOWNSCALE_PERIOD, logger)?;
        scope.downtime = parse_value(&lookup, ANNOTATION_DOWNTIME, logger)?;
        scope.upscale_period = parse_value(&lookup, ANNOTATION_UPSCALE_PERIOD, logger)?;
        scope.uptime = parse_value(&lookup, ANNOTATION_UPTIME, logger)?;
        scope.exclude = parse_value(&lookup, ANNOTATION_EXCLUDE, logger)?;
        scope.exclude_until = parse_with(&lookup, ANNOTATION_EXCLUDE_UNTIL, logger, |raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| ValueError::InvalidTimestamp(raw.to_string()))
        })?;
        scope.force_uptime = parse_value(&lookup, ANNOTATION_FORCE_UPTIME, logger)?;
        scope.force_downtime = parse_value(&lookup, ANNOTATION_FORCE_DOWNTIME, logger)?;
        scope.downscale_replicas = parse_value(&lookup, ANNOTATION_DOWNSCALE_REPLICAS, logger)?;
        scope.grace_period = parse_with(&lookup, ANNOTATION_GRACE_PERIOD, logger, parse_duration)?;
        if let Some(value) = parse_value(&lookup, ANNOTATION_SCALE_CHILDREN, logger)? {
            scope.scale_children = value;
        }
        if let Some(value) = parse_value(&lookup, ANNOTATION_UPSCALE_EXCLUDED, logger)? {
            scope.upscale_excluded = value;
        }

        validated(scope, logger)
    }

    /// Builds the environment-variable scope once at process start.
    pub fn from_env(logger: &dyn ResourceLogger) -> Result<Scope, ScopeError> {
        Scope::from_env_lookup(&|key| std::env::var(key).ok(), logger)
    }

    pub(crate) fn from_env_lookup(
        lookup: &dyn Fn(&str) -> Option<String>,
        logger: &dyn ResourceLogger,
    ) -> Result<Scope, ScopeError> {
        let mut scope = Scope::new();

        scope.upscale_period = parse_value(lookup, ENV_UPSCALE_PERIOD, logger)?;
        scope.uptime = parse_value(lookup, ENV_UPTIME, logger)?;
        scope.downscale_period = parse_value(lookup, ENV_DOWNSCALE_PERIOD, logger)?;
        scope.downtime = parse_value(lookup, ENV_DOWNTIME, logger)?;
        scope.default_timezone = parse_with(lookup, ENV_TIMEZONE, logger, |raw| {
            raw.parse::<Tz>()
                .map_err(|_| ValueError::InvalidTimezone(raw.to_string()))
        })?;
        scope.default_week_frame = parse_value(lookup, ENV_WEEK_FRAME, logger)?;

        validated(scope, logger)
    }
}

fn validated(scope: Scope, logger: &dyn ResourceLogger) -> Result<Scope, ScopeError> {
    if let Err(err) = scope.check_for_incompatible_fields() {
        logger.incompatible_fields(&err.to_string());
        return Err(err);
    }
    Ok(scope)
}

fn parse_value<T>(
    lookup: &dyn Fn(&str) -> Option<String>,
    key: &str,
    logger: &dyn ResourceLogger,
) -> Result<Option<T>, ScopeError>
where
    T: FromStr<Err = ValueError>,
{
    parse_with(lookup, key, logger, |raw| raw.parse::<T>())
}

fn parse_with<T>(
    lookup: &dyn Fn(&str) -> Option<String>,
    key: &str,
    logger: &dyn ResourceLogger,
    parse: impl Fn(&str) -> Result<T, ValueError>,
) -> Result<Option<T>, ScopeError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    match parse(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(source) => {
            let err = ScopeError::Parse {
                key: key.to_string(),
                value: raw,
                source,
            };
            logger.invalid_annotation(key, &err.to_string());
            Err(err)
        }
    }
}
