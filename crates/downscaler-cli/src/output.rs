//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// One name/value row of a report table
#[derive(Tabled)]
pub struct FieldRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl FieldRow {
    pub fn new(field: impl Into<String>, value: impl ToString) -> FieldRow {
        FieldRow {
            field: field.into(),
            value: value.to_string(),
        }
    }
}

/// Print a report either as a field table or as pretty JSON
pub fn print_report<T: Serialize>(
    report: &T,
    rows: Vec<FieldRow>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    }
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Color a scaling state for terminal display
pub fn color_scaling(scaling: &str) -> String {
    match scaling {
        "up" => scaling.green().to_string(),
        "down" => scaling.blue().to_string(),
        "multiple" | "incomplete" => scaling.red().to_string(),
        _ => scaling.to_string(),
    }
}
