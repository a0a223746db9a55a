//! # Rate-Table Validation CLI
//!
//! `vilkar validate-rates FILE` loads a rate-table YAML exactly as the
//! engine would and reports what it found. Exit code 0 means the file is
//! usable.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use vilkar_sats::SatsConfig;

/// Arguments for `vilkar validate-rates`.
#[derive(Args, Debug)]
pub struct ValidateRatesArgs {
    /// Rate-table YAML file.
    pub file: PathBuf,
}

/// Execute the validate-rates subcommand.
pub fn run_validate_rates(args: &ValidateRatesArgs) -> Result<u8> {
    let summary = validate_rates(&args.file)?;
    println!("{summary}");
    Ok(0)
}

/// Load and validate a rate table, returning a one-line summary.
pub fn validate_rates(path: &std::path::Path) -> Result<String> {
    let config = SatsConfig::from_path(path)
        .with_context(|| format!("rate table rejected: {}", path.display()))?;
    let table = config.wage_base_table()?;
    let entries = table.entries();
    let (first, last) = match (entries.first(), entries.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => anyhow::bail!("rate table has no wage-base entries"),
    };
    Ok(format!(
        "OK: {} wage-base revisions from {} ({}) to {} ({}), asset limit factor {}",
        entries.len(),
        first.effective_from,
        first.amount,
        last.effective_from,
        last.amount,
        config.asset_limit_factor
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_yaml(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn valid_file_is_summarized() {
        let file = write_yaml(
            "wage_base:\n  - effective_from: \"2022-05\"\n    amount: 111477\n  - effective_from: \"2021-05\"\n    amount: 106399\n",
        );
        let summary = validate_rates(file.path()).unwrap();
        assert_eq!(
            summary,
            "OK: 2 wage-base revisions from 2021-05 (106399) to 2022-05 (111477), asset limit factor 1/2"
        );
    }

    #[test]
    fn duplicate_revision_is_rejected() {
        let file = write_yaml(
            "wage_base:\n  - effective_from: \"2021-05\"\n    amount: 1\n  - effective_from: \"2021-05\"\n    amount: 2\n",
        );
        let err = validate_rates(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("rate table rejected"), "{err:#}");
    }

    #[test]
    fn missing_file_is_reported() {
        let args = ValidateRatesArgs {
            file: PathBuf::from("/nonexistent/rates.yaml"),
        };
        assert!(run_validate_rates(&args).is_err());
    }
}
