//! # Limits CLI — Print the asset limit in force for each month.
//!
//! ```bash
//! vilkar limits --from 2021-01 --to 2021-12
//! vilkar limits --from 2021-01 --to 2021-12 --format yaml
//! ```

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use vilkar_core::{Month, Period};
use vilkar_sats::{AssetLimit, AssetLimitSource, SatsConfig};

/// Arguments for `vilkar limits`.
#[derive(Args, Debug)]
pub struct LimitsArgs {
    /// First month (`YYYY-MM`).
    #[arg(long)]
    pub from: Month,

    /// Last month (`YYYY-MM`).
    #[arg(long)]
    pub to: Month,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// Execute the limits subcommand.
pub fn run_limits(args: &LimitsArgs, rates: &SatsConfig) -> Result<u8> {
    let limits = monthly_limits(args.from, args.to, rates)?;
    print!("{}", render(&limits, args.format)?);
    Ok(0)
}

/// Limits for every month from `from` to `to`, inclusive.
pub fn monthly_limits(from: Month, to: Month, rates: &SatsConfig) -> Result<Vec<AssetLimit>> {
    let period = Period::from_months(from, to).context("invalid month range")?;
    let table = rates
        .asset_limits(period)
        .with_context(|| format!("rate table does not cover {from}..{to}"))?;
    Ok(table.iter().copied().collect())
}

fn render(limits: &[AssetLimit], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(limits).context("failed to serialize limits")?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => serde_yaml::to_string(limits).context("failed to serialize limits"),
        OutputFormat::Table => {
            let mut out = format!("{:<8} {:>10} {:>10}\n", "month", "wage_base", "limit");
            for l in limits {
                let base = l.wage_base.map_or_else(|| "-".to_string(), |b| b.to_string());
                out.push_str(&format!("{:<8} {:>10} {:>10}\n", l.month.to_string(), base, l.limit));
            }
            Ok(out)
        }
    }
}
