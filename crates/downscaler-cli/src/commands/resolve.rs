//! The `resolve` subcommand: dry-run one workload's scaling decision

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::Args;
use downscaler_lib::{
    Replicas, Scope, Scopes, TimeSpanSet, TracingLogger, TriStateBool, WeekFrame,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::commands::{parse_instant, parse_key_value};
use crate::output::{color_scaling, print_report, FieldRow, OutputFormat};

#[derive(Args)]
pub struct ResolveArgs {
    /// Workload annotation, repeatable (KEY=VALUE)
    #[arg(long = "annotation", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub annotations: Vec<(String, String)>,

    /// Namespace annotation, repeatable (KEY=VALUE)
    #[arg(long = "ns-annotation", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub ns_annotations: Vec<(String, String)>,

    /// Instant to evaluate at (RFC3339), defaults to now
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<DateTime<Utc>>,

    /// Workload creation timestamp (RFC3339) for the grace-period check
    #[arg(long, value_parser = parse_instant)]
    pub created_at: Option<DateTime<Utc>>,

    /// Annotation key whose RFC3339 value restarts the grace period
    #[arg(long)]
    pub time_annotation: Option<String>,

    #[command(flatten)]
    pub flags: ScopeFlags,
}

/// The CLI configuration layer, sitting between namespace annotations and
/// environment variables in precedence.
#[derive(Args)]
pub struct ScopeFlags {
    /// Spans during which workloads are scaled down, otherwise up
    #[arg(long)]
    pub downtime: Option<TimeSpanSet>,

    /// Spans during which workloads are scaled up, otherwise down
    #[arg(long)]
    pub uptime: Option<TimeSpanSet>,

    /// Periods to scale down in, abstaining outside of them
    #[arg(long)]
    pub downscale_period: Option<TimeSpanSet>,

    /// Periods to scale up in, abstaining outside of them
    #[arg(long)]
    pub upscale_period: Option<TimeSpanSet>,

    /// Spans during which workloads are excluded from scaling
    #[arg(long)]
    pub exclude: Option<TimeSpanSet>,

    /// Deadline (RFC3339) until which workloads are excluded
    #[arg(long, value_parser = parse_instant)]
    pub exclude_until: Option<DateTime<Utc>>,

    /// Spans forcing an uptime state
    #[arg(long)]
    pub force_uptime: Option<TimeSpanSet>,

    /// Spans forcing a downtime state
    #[arg(long)]
    pub force_downtime: Option<TimeSpanSet>,

    /// Replica target while scaled down (count or percentage)
    #[arg(long)]
    pub downscale_replicas: Option<Replicas>,

    /// Grace period after creation (seconds or e.g. "15m")
    #[arg(long, value_parser = parse_grace)]
    pub grace_period: Option<Duration>,

    /// Whether scaling also scales a workload's children
    #[arg(long)]
    pub scale_children: Option<bool>,

    /// Whether excluded workloads are still upscaled
    #[arg(long)]
    pub upscale_excluded: Option<bool>,

    /// Timezone for relative spans that omit one
    #[arg(long)]
    pub default_timezone: Option<Tz>,

    /// Weekday range for relative spans that omit one (e.g. "Mon-Fri")
    #[arg(long)]
    pub default_weekframe: Option<WeekFrame>,
}

fn parse_grace(raw: &str) -> Result<Duration, String> {
    downscaler_lib::values::parse_duration(raw).map_err(|err| err.to_string())
}

impl ScopeFlags {
    pub fn into_scope(self) -> Scope {
        Scope {
            downtime: self.downtime,
            uptime: self.uptime,
            downscale_period: self.downscale_period,
            upscale_period: self.upscale_period,
            exclude: self.exclude,
            exclude_until: self.exclude_until,
            force_uptime: self.force_uptime,
            force_downtime: self.force_downtime,
            downscale_replicas: self.downscale_replicas,
            grace_period: self.grace_period,
            scale_children: self
                .scale_children
                .map(TriStateBool::from)
                .unwrap_or_default(),
            upscale_excluded: self
                .upscale_excluded
                .map(TriStateBool::from)
                .unwrap_or_default(),
            default_timezone: self.default_timezone,
            default_week_frame: self.default_weekframe,
        }
    }
}

#[derive(Serialize)]
struct ResolveReport {
    at: DateTime<Utc>,
    scaling: String,
    excluded: bool,
    upscale_excluded: bool,
    scale_children: bool,
    downscale_replicas: String,
    grace_period_seconds: u64,
    in_grace_period: Option<bool>,
}

pub fn run(args: ResolveArgs, format: OutputFormat) -> Result<()> {
    let logger = TracingLogger;

    let workload_annotations: BTreeMap<String, String> = args.annotations.into_iter().collect();
    let workload = Scope::from_annotations(&workload_annotations, &logger)
        .context("invalid workload annotations")?;

    let ns_annotations: BTreeMap<String, String> = args.ns_annotations.into_iter().collect();
    let namespace = Scope::from_annotations(&ns_annotations, &logger)
        .context("invalid namespace annotations")?;

    let cli = args.flags.into_scope();
    cli.check_for_incompatible_fields()
        .context("incompatible command-line flags")?;

    let environment = Scope::from_env(&logger).context("invalid environment variables")?;
    let default = Scope::default_scope();
    default.validate_default()?;

    let scopes = Scopes::new(&workload, &namespace, &cli, &environment, &default);

    let at = args.at.unwrap_or_else(Utc::now);
    let scaling = scopes.current_scaling(at);
    let excluded = scopes.excluded(at)?;
    let replicas = scopes.downscale_replicas()?;
    let grace = scopes.grace_period()?;
    let in_grace_period = match args.created_at {
        Some(created_at) => Some(scopes.in_grace_period(
            args.time_annotation.as_deref(),
            &workload_annotations,
            created_at,
            at,
            &logger,
        )?),
        None => None,
    };

    let report = ResolveReport {
        at,
        scaling: scaling.to_string(),
        excluded,
        upscale_excluded: scopes.upscale_excluded(),
        scale_children: scopes.scale_children(),
        downscale_replicas: replicas.to_string(),
        grace_period_seconds: grace.as_secs(),
        in_grace_period,
    };

    let mut rows = vec![
        FieldRow::new("At", report.at.to_rfc3339()),
        FieldRow::new("Scaling", color_scaling(&report.scaling)),
        FieldRow::new("Excluded", report.excluded),
        FieldRow::new("Upscale excluded", report.upscale_excluded),
        FieldRow::new("Scale children", report.scale_children),
        FieldRow::new("Downscale replicas", &report.downscale_replicas),
        FieldRow::new("Grace period (s)", report.grace_period_seconds),
    ];
    if let Some(in_grace) = report.in_grace_period {
        rows.push(FieldRow::new("In grace period", in_grace));
    }

    print_report(&report, rows, format)
}
