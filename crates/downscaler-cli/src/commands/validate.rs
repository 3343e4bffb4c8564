//! The `validate` subcommand: check annotation values before deploying them

use anyhow::{bail, Result};
use clap::Args;
use downscaler_lib::{Scope, TimeSpanSet, TracingLogger};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::commands::parse_key_value;
use crate::output::{print_error, print_success, OutputFormat};

#[derive(Args)]
pub struct ValidateArgs {
    /// Timespan expressions to validate
    #[arg(value_name = "TIMESPAN")]
    pub spans: Vec<String>,

    /// Annotations to validate as one scope, repeatable (KEY=VALUE)
    #[arg(long = "annotation", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub annotations: Vec<(String, String)>,
}

#[derive(Serialize)]
struct ValidationItem {
    input: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(args: ValidateArgs, format: OutputFormat) -> Result<()> {
    let mut items = Vec::new();

    for raw in &args.spans {
        match raw.parse::<TimeSpanSet>() {
            Ok(set) => items.push(ValidationItem {
                input: raw.clone(),
                valid: true,
                canonical: Some(set.to_string()),
                error: None,
            }),
            Err(err) => items.push(ValidationItem {
                input: raw.clone(),
                valid: false,
                canonical: None,
                error: Some(err.to_string()),
            }),
        }
    }

    if !args.annotations.is_empty() {
        let map: BTreeMap<String, String> = args.annotations.iter().cloned().collect();
        let input = map
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        match Scope::from_annotations(&map, &TracingLogger) {
            Ok(_) => items.push(ValidationItem {
                input,
                valid: true,
                canonical: None,
                error: None,
            }),
            Err(err) => items.push(ValidationItem {
                input,
                valid: false,
                canonical: None,
                error: Some(err.to_string()),
            }),
        }
    }

    let invalid = items.iter().filter(|item| !item.valid).count();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
        OutputFormat::Table => {
            for item in &items {
                if item.valid {
                    match &item.canonical {
                        Some(canonical) => {
                            print_success(&format!("{} (canonical: {})", item.input, canonical))
                        }
                        None => print_success(&item.input),
                    }
                } else {
                    let reason = item.error.as_deref().unwrap_or("invalid");
                    print_error(&format!("{}: {}", item.input, reason));
                }
            }
        }
    }

    if invalid > 0 {
        bail!("{invalid} invalid value(s)");
    }
    Ok(())
}
