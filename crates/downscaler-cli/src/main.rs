//! Kube Downscaler schedule CLI
//!
//! A command-line tool for dry-running the downscaler's scaling decisions:
//! feed it the annotations, flags and environment a workload would see and
//! it reports the resolved scaling state, exclusion and grace verdicts.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Kube Downscaler schedule CLI
#[derive(Parser)]
#[command(name = "kds")]
#[command(author, version, about = "Inspect kube downscaler scaling schedules", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the scaling state for a simulated workload
    Resolve(commands::resolve::ResolveArgs),

    /// Validate annotation values and timespan expressions
    Validate(commands::validate::ValidateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Resolve(args) => commands::resolve::run(args, cli.format),
        Commands::Validate(args) => commands::validate::run(args, cli.format),
    }
}
