//! # vilkar-cli — Command-Line Interface for the Vilkår Engine
//!
//! ## Subcommands
//!
//! - `evaluate`: build a case from JSON, optionally reconcile it onto a new
//!   support period, and print the outcome with the replacement batch.
//! - `limits`: print per-month asset limits.
//! - `validate-rates`: check a rate-table YAML file.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers live here so they can
//!   be tested without spawning the binary.
//! - Handlers delegate to the engine crates. No eligibility logic here.

pub mod case;
pub mod evaluate;
pub mod limits;
pub mod rates;

use std::path::Path;

use anyhow::{Context, Result};
use vilkar_sats::{SatsConfig, RATE_TABLE_ENV};

/// Environment variable selecting the log format. `json` enables JSON logs.
pub const LOG_FORMAT_ENV: &str = "VILKAR_LOG_FORMAT";

/// Rate table from `--rates`, else `VILKAR_RATE_TABLE`, else the built-in history.
pub fn load_rates(path: Option<&Path>) -> Result<SatsConfig> {
    match path {
        Some(path) => SatsConfig::from_path(path)
            .with_context(|| format!("failed to load rate table: {}", path.display())),
        None => SatsConfig::from_env()
            .with_context(|| format!("failed to load rate table (check {RATE_TABLE_ENV})")),
    }
}

/// Whether JSON logs were requested by flag or environment.
pub fn json_logs_requested(flag: bool) -> bool {
    flag || std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"))
}
