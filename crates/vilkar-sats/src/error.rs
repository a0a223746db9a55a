//! Error types for rate-table construction, lookup and loading.

use std::path::PathBuf;

use thiserror::Error;
use vilkar_core::{Month, PeriodError};

/// Errors raised by rate tables.
#[derive(Error, Debug)]
pub enum SatsError {
    /// Rate-table YAML could not be parsed.
    #[error("failed to parse rate table YAML at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Rate-table file could not be read.
    #[error("failed to read rate table at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A table with no entries.
    #[error("rate table has no entries")]
    EmptyTable,

    /// Two entries take effect in the same month.
    #[error("rate table has more than one entry for {month}")]
    DuplicateEntry { month: Month },

    /// A monthly table skips one or more months.
    #[error("rate table has a gap between {after} and {next}")]
    Gap { after: Month, next: Month },

    /// Lookup for a month the table does not cover.
    #[error("rate table does not cover {month}")]
    MonthNotCovered { month: Month },

    /// Scaling factor with a zero term.
    #[error("invalid asset limit factor {numerator}/{denominator}")]
    InvalidFactor { numerator: u32, denominator: u32 },

    /// Malformed period while deriving a table.
    #[error("period error: {0}")]
    Period(#[from] PeriodError),
}
