//! Construction errors for criteria.
//!
//! Everything here is recoverable and caller-facing: a caseworker
//! submitted overlapping periods, a basis record for the wrong period, or
//! asked to move a criterion that cannot be moved.

use thiserror::Error;
use vilkar_core::{CriterionKind, Period, PeriodError};
use vilkar_sats::SatsError;

/// Rejected criterion, assessment period or basis record.
#[derive(Error, Debug)]
pub enum CriterionError {
    /// Two assessment periods in the same criterion share a month.
    #[error("assessment periods {first} and {second} overlap")]
    OverlappingPeriods { first: Period, second: Period },

    /// An assessed criterion must have at least one period.
    #[error("an assessed criterion needs at least one assessment period")]
    EmptyAssessment,

    /// A basis record attached to an assessment period for a different period.
    #[error("basis period {basis} differs from assessment period {assessment}")]
    BasisPeriodMismatch { assessment: Period, basis: Period },

    /// Reconciling a criterion whose domain allows only one period.
    #[error("{kind} can only be moved to a new period with exactly one assessment period, found {count}")]
    MultiplePeriodsNotReconcilable { kind: CriterionKind, count: usize },

    /// Assets assessment period without an assets basis.
    #[error("{kind} assessment period for {period} has no basis record")]
    MissingBasis { kind: CriterionKind, period: Period },

    /// Basis facts outside their valid range.
    #[error("invalid {kind} basis: {reason}")]
    InvalidBasis { kind: CriterionKind, reason: String },

    /// Rate-table lookup failed during threshold evaluation.
    #[error("rate table error: {0}")]
    RateTable(#[from] SatsError),

    /// Malformed period.
    #[error("period error: {0}")]
    Period(#[from] PeriodError),
}
