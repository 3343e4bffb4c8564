//! Subcommand implementations

pub mod resolve;
pub mod validate;

use chrono::{DateTime, Utc};

/// Parses a `key=value` pair for repeatable annotation flags.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

/// Parses an RFC3339 instant for `--at` style flags.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|err| format!("expected an RFC3339 timestamp: {err}"))
}
