//! # vilkar CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vilkar_cli::evaluate::{run_evaluate, EvaluateArgs};
use vilkar_cli::limits::{run_limits, LimitsArgs};
use vilkar_cli::rates::{run_validate_rates, ValidateRatesArgs};
use vilkar_cli::{json_logs_requested, load_rates};

/// Vilkår engine: eligibility criteria evaluation and reconciliation.
#[derive(Parser, Debug)]
#[command(name = "vilkar", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Rate-table YAML. Defaults to $VILKAR_RATE_TABLE, then the built-in history.
    #[arg(long, global = true)]
    rates: Option<PathBuf>,

    /// Emit logs as JSON (also enabled by VILKAR_LOG_FORMAT=json).
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a case file and print its outcome.
    Evaluate(EvaluateArgs),

    /// Print the asset limit for each month of a range.
    Limits(LimitsArgs),

    /// Check that a rate-table YAML file loads.
    ValidateRates(ValidateRatesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, json_logs_requested(cli.json_logs));

    let result = match &cli.command {
        Commands::Evaluate(args) => {
            load_rates(cli.rates.as_deref()).and_then(|rates| run_evaluate(args, &rates))
        }
        Commands::Limits(args) => {
            load_rates(cli.rates.as_deref()).and_then(|rates| run_limits(args, &rates))
        }
        Commands::ValidateRates(args) => run_validate_rates(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// `RUST_LOG` wins when set; otherwise verbosity picks the level.
fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
