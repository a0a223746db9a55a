//! # Evaluate CLI — Case outcome and persistence batch for a case file.
//!
//! ```bash
//! # Outcome for the case as assessed:
//! vilkar evaluate case.json
//!
//! # Move every criterion onto a new support period first:
//! vilkar evaluate case.json --reconcile 2021-06..2022-05
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use vilkar_aggregate::{CaseOutcome, CriterionAggregate, ReplacementBatch};
use vilkar_core::{CaseId, Period};
use vilkar_sats::{AssetLimitSource, SatsConfig};

use crate::case::CaseFile;

/// Arguments for `vilkar evaluate`.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Case file (JSON).
    pub case: PathBuf,

    /// Reconcile every criterion onto this period (`YYYY-MM..YYYY-MM`).
    #[arg(long)]
    pub reconcile: Option<Period>,

    /// Only include criteria whose content changed in the replacement batch.
    #[arg(long, requires = "reconcile")]
    pub changed_only: bool,
}

/// Everything `evaluate` prints.
#[derive(Debug, Serialize)]
pub struct EvaluationReport {
    pub case_id: CaseId,
    pub outcome: CaseOutcome,
    pub replacement: ReplacementBatch,
}

/// Execute the evaluate subcommand.
pub fn run_evaluate(args: &EvaluateArgs, rates: &SatsConfig) -> Result<u8> {
    let case = CaseFile::from_path(&args.case)?;
    let report = evaluate_case(&case, rates, args.reconcile, args.changed_only)?;
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{json}");
    Ok(0)
}

/// Build, optionally reconcile, and derive the outcome for a case.
pub fn evaluate_case(
    case: &CaseFile,
    rates: &SatsConfig,
    reconcile: Option<Period>,
    changed_only: bool,
) -> Result<EvaluationReport> {
    let limits = case
        .asset_limit_span(reconcile)?
        .map(|span| rates.asset_limits(span))
        .transpose()
        .context("rate table does not cover the case")?;

    let assessed = case.to_aggregate(limits.as_ref())?;
    let case_id = case.case_id();

    let (aggregate, replacement) = match reconcile {
        Some(target) => {
            let limits = limits
                .as_ref()
                .context("no asset-limit table for the reconciliation target")?;
            let moved = assessed
                .update_period(target, limits)
                .with_context(|| format!("failed to reconcile onto {target}"))?;
            let batch = if changed_only {
                ReplacementBatch::changed_since(case_id, &assessed, &moved)
            } else {
                ReplacementBatch::for_aggregate(case_id, &moved)
            };
            (moved, batch)
        }
        None => {
            let batch = ReplacementBatch::for_aggregate(case_id, &assessed);
            (assessed, batch)
        }
    };

    log_outcome(&aggregate);
    Ok(EvaluationReport {
        case_id,
        outcome: aggregate.outcome(),
        replacement,
    })
}

fn log_outcome(aggregate: &CriterionAggregate) {
    tracing::info!(
        step = %aggregate.step(),
        track = %aggregate.track(),
        verdict = %aggregate.verdict(),
        fully_assessed = aggregate.is_fully_assessed(),
        "case evaluated"
    );
}
