//! # Aggregate Errors
//!
//! Two classes share one enum:
//!
//! - **Invariant violations** ([`AggregateError::is_fatal`] is `true`):
//!   a bundle whose assessed members disagree on their period partition,
//!   or a member that does not belong in the bundle. These indicate a
//!   defect upstream and abort the enclosing case update.
//! - **Caller-facing errors**: wrapped criterion construction failures and
//!   ambiguous denial-cause queries.

use thiserror::Error;
use vilkar_core::{CaseTrack, CriterionKind, Period};
use vilkar_criteria::CriterionError;

/// Error building, updating or interpreting a criterion aggregate.
#[derive(Error, Debug)]
pub enum AggregateError {
    /// Two assessed members cover different period partitions.
    #[error(
        "period partition mismatch: {first} covers [{}] but {second} covers [{}]",
        display_partition(.first_partition),
        display_partition(.second_partition)
    )]
    PartitionMismatch {
        first: CriterionKind,
        first_partition: Vec<Period>,
        second: CriterionKind,
        second_partition: Vec<Period>,
    },

    /// A criterion kind outside the bundle for this track.
    #[error("{kind} is not part of the {track} criterion bundle")]
    CriterionNotInBundle { kind: CriterionKind, track: CaseTrack },

    /// The same kind supplied twice when building a bundle.
    #[error("{kind} supplied more than once")]
    DuplicateCriterion { kind: CriterionKind },

    /// Several criteria are denied and the queried one is not among them.
    #[error("{kind} is not denied and the outcome has several denied criteria: {}", display_kinds(.denied))]
    AmbiguousDenialCause {
        kind: CriterionKind,
        denied: Vec<CriterionKind>,
    },

    /// A member criterion rejected the operation.
    #[error("criterion error: {0}")]
    Criterion(#[from] CriterionError),
}

impl AggregateError {
    /// `true` for invariant violations that must abort the case update.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::PartitionMismatch { .. }
            | Self::CriterionNotInBundle { .. }
            | Self::DuplicateCriterion { .. } => true,
            Self::AmbiguousDenialCause { .. } | Self::Criterion(_) => false,
        }
    }
}

fn display_partition(periods: &[Period]) -> String {
    periods
        .iter()
        .map(Period::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_kinds(kinds: &[CriterionKind]) -> String {
    kinds
        .iter()
        .map(CriterionKind::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_mismatch_is_fatal_and_readable() {
        let h1 = Period::from_months(
            "2021-01".parse().unwrap(),
            "2021-06".parse().unwrap(),
        )
        .unwrap();
        let y = Period::calendar_year(2021).unwrap();
        let err = AggregateError::PartitionMismatch {
            first: CriterionKind::Disability,
            first_partition: vec![h1],
            second: CriterionKind::Assets,
            second_partition: vec![y],
        };
        assert!(err.is_fatal());
        let msg = err.to_string();
        assert!(msg.contains("disability covers [2021-01-01..2021-06-30]"), "{msg}");
        assert!(msg.contains("assets covers [2021-01-01..2021-12-31]"), "{msg}");
    }

    #[test]
    fn caller_facing_errors_are_not_fatal() {
        let err = AggregateError::AmbiguousDenialCause {
            kind: CriterionKind::ForeignStay,
            denied: vec![CriterionKind::Assets, CriterionKind::Disability],
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().ends_with("assets, disability"));
        assert!(!AggregateError::Criterion(CriterionError::EmptyAssessment).is_fatal());
    }
}
