//! # Criterion Aggregate ("vilkårsvurderinger")
//!
//! The full bundle of criteria for one case at one processing step. The
//! member set is fixed by the [`CaseTrack`]; see [`CriterionKind::belongs_to`].
//!
//! ## Invariant
//!
//! Every assessed member has the same period partition (the ordered list
//! of maximal contiguous spans its assessment periods cover). Unassessed
//! members are exempt. A value violating this cannot be constructed: every
//! operation that can change a partition re-checks it and fails with a
//! fatal [`AggregateError`].
//!
//! Aggregates are never patched in place. Replacing a member or moving the
//! bundle to a new period returns a new aggregate.

use serde::{Deserialize, Serialize};
use vilkar_core::{min_and_max_of, CaseTrack, CriterionKind, Period};
use vilkar_criteria::{Criterion, Verdict};
use vilkar_sats::AssetLimitTable;

use crate::error::AggregateError;
use crate::outcome::{self, CaseOutcome};

/// The case-processing step an aggregate is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStep {
    /// First-time handling of an application ("søknadsbehandling").
    Application,
    /// Reassessment of an existing decision ("revurdering").
    Reassessment,
}

impl ProcessingStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Reassessment => "reassessment",
        }
    }
}

impl std::fmt::Display for ProcessingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One criterion per member kind of the track, in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionAggregate {
    step: ProcessingStep,
    track: CaseTrack,
    criteria: Vec<Criterion>,
}

impl CriterionAggregate {
    /// Every member unassessed.
    pub fn unassessed(step: ProcessingStep, track: CaseTrack) -> Self {
        Self {
            step,
            track,
            criteria: track
                .criteria()
                .into_iter()
                .map(Criterion::unassessed)
                .collect(),
        }
    }

    /// Build a bundle from the supplied criteria. Members not supplied
    /// start unassessed.
    ///
    /// # Errors
    ///
    /// Fatal [`AggregateError`] if a criterion is outside the bundle, a
    /// kind is supplied twice, or assessed partitions differ.
    pub fn try_new(
        step: ProcessingStep,
        track: CaseTrack,
        criteria: Vec<Criterion>,
    ) -> Result<Self, AggregateError> {
        let mut aggregate = Self::unassessed(step, track);
        let mut seen: Vec<CriterionKind> = Vec::with_capacity(criteria.len());
        for criterion in criteria {
            let kind = criterion.kind();
            if seen.contains(&kind) {
                tracing::error!(kind = %kind, "criterion supplied twice for one aggregate");
                return Err(AggregateError::DuplicateCriterion { kind });
            }
            seen.push(kind);
            aggregate.put(criterion)?;
        }
        check_partitions(&aggregate.criteria)?;
        Ok(aggregate)
    }

    pub fn step(&self) -> ProcessingStep {
        self.step
    }

    pub fn track(&self) -> CaseTrack {
        self.track
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn get(&self, kind: CriterionKind) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.kind() == kind)
    }

    /// A new aggregate with the member of the same kind replaced.
    ///
    /// # Errors
    ///
    /// Fatal [`AggregateError`] if the kind is outside the bundle or the
    /// replacement breaks the shared partition.
    pub fn replace_criterion(&self, criterion: Criterion) -> Result<Self, AggregateError> {
        let mut next = self.clone();
        next.put(criterion)?;
        check_partitions(&next.criteria)?;
        Ok(next)
    }

    /// Reconcile every member onto `target`.
    ///
    /// The assets member is re-evaluated against `limits`.
    pub fn update_period(
        &self,
        target: Period,
        limits: &AssetLimitTable,
    ) -> Result<Self, AggregateError> {
        let criteria = self
            .criteria
            .iter()
            .map(|c| c.reconcile(target, limits))
            .collect::<Result<Vec<_>, _>>()?;
        check_partitions(&criteria)?;
        tracing::debug!(
            step = %self.step,
            track = %self.track,
            target = %target,
            "criterion aggregate moved to new period"
        );
        Ok(Self { criteria, ..*self })
    }

    /// Restrict every member to `period`.
    pub fn clip_to(&self, period: Period) -> Self {
        self.map(|c| c.clip_to(period))
    }

    pub fn copy_with_new_ids(&self) -> Self {
        self.map(Criterion::copy_with_new_ids)
    }

    /// Same step, track and member-wise equivalent criteria.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.step == other.step
            && self.track == other.track
            && self.criteria.len() == other.criteria.len()
            && self
                .criteria
                .iter()
                .zip(&other.criteria)
                .all(|(a, b)| a.is_equivalent(b))
    }

    /// The partition shared by the assessed members; empty if none is assessed.
    pub fn partition(&self) -> Vec<Period> {
        self.criteria
            .iter()
            .find(|c| c.is_assessed())
            .map(Criterion::partition)
            .unwrap_or_default()
    }

    pub fn covering_period(&self) -> Option<Period> {
        let all: Vec<Period> = self.criteria.iter().flat_map(Criterion::periods).collect();
        min_and_max_of(&all)
    }

    /// Meet over every member's verdict.
    pub fn verdict(&self) -> Verdict {
        Verdict::meet_all(self.criteria.iter().map(Criterion::verdict))
    }

    /// No member is undetermined.
    pub fn is_fully_assessed(&self) -> bool {
        self.criteria
            .iter()
            .all(|c| c.verdict() != Verdict::Undetermined)
    }

    pub fn to_reassessment(&self) -> Self {
        Self {
            step: ProcessingStep::Reassessment,
            ..self.clone()
        }
    }

    pub fn to_application(&self) -> Self {
        Self {
            step: ProcessingStep::Application,
            ..self.clone()
        }
    }

    /// The case-level outcome.
    pub fn outcome(&self) -> CaseOutcome {
        outcome::derive_verdict(self)
    }

    fn put(&mut self, criterion: Criterion) -> Result<(), AggregateError> {
        let kind = criterion.kind();
        match self.criteria.iter_mut().find(|c| c.kind() == kind) {
            Some(slot) => {
                *slot = criterion;
                Ok(())
            }
            None => {
                tracing::error!(kind = %kind, track = %self.track, "criterion outside aggregate bundle");
                Err(AggregateError::CriterionNotInBundle {
                    kind,
                    track: self.track,
                })
            }
        }
    }

    fn map(&self, f: impl Fn(&Criterion) -> Criterion) -> Self {
        Self {
            step: self.step,
            track: self.track,
            criteria: self.criteria.iter().map(f).collect(),
        }
    }
}

/// Fail unless every assessed criterion has the same partition.
pub fn check_partitions(criteria: &[Criterion]) -> Result<(), AggregateError> {
    let mut assessed = criteria.iter().filter(|c| c.is_assessed());
    let Some(reference) = assessed.next() else {
        return Ok(());
    };
    let expected = reference.partition();
    for other in assessed {
        let actual = other.partition();
        if actual != expected {
            tracing::error!(
                first = %reference.kind(),
                second = %other.kind(),
                "assessed criteria disagree on period partition"
            );
            return Err(AggregateError::PartitionMismatch {
                first: reference.kind(),
                first_partition: expected,
                second: other.kind(),
                second_partition: actual,
            });
        }
    }
    Ok(())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::fixtures::*;
    use proptest::prelude::*;
    use vilkar_core::Month;

    fn arb_verdict() -> impl Strategy<Value = Verdict> {
        prop_oneof![
            Just(Verdict::Approved),
            Just(Verdict::Denied),
            Just(Verdict::Undetermined),
        ]
    }

    /// Ordered, non-overlapping periods starting at or after January 2020.
    fn arb_timeline() -> impl Strategy<Value = Vec<(Period, Verdict)>> {
        prop::collection::vec((0i32..3, 1i32..7, arb_verdict()), 1..5).prop_map(|pieces| {
            let mut cursor = Month::new(2020, 1).unwrap();
            let mut out = Vec::new();
            for (gap, len, verdict) in pieces {
                let first = cursor.plus(gap).unwrap();
                let last = first.plus(len - 1).unwrap();
                out.push((Period::from_months(first, last).unwrap(), verdict));
                cursor = last.plus(1).unwrap();
            }
            out
        })
    }

    fn bundle(track: CaseTrack, timeline: &[(Period, Verdict)]) -> CriterionAggregate {
        let criteria = track
            .criteria()
            .into_iter()
            .map(|kind| plain(kind, timeline))
            .collect();
        CriterionAggregate::try_new(ProcessingStep::Application, track, criteria).unwrap()
    }

    proptest! {
        #[test]
        fn replace_criterion_preserves_partition(
            base in arb_timeline(),
            verdicts in prop::collection::vec(arb_verdict(), 5),
            index in 0usize..9,
        ) {
            let agg = bundle(CaseTrack::Age, &base);
            let kind = CaseTrack::Age.criteria()[index];
            // Same periods, fresh verdicts.
            let relabelled: Vec<(Period, Verdict)> = base
                .iter()
                .zip(&verdicts)
                .map(|((p, _), v)| (*p, *v))
                .collect();

            let next = agg.replace_criterion(plain(kind, &relabelled)).unwrap();
            prop_assert_eq!(next.partition(), agg.partition());
            prop_assert_eq!(next.criteria().len(), agg.criteria().len());
            prop_assert_eq!(next.get(kind).unwrap().periods(), base.iter().map(|(p, _)| *p).collect::<Vec<_>>());
        }

        #[test]
        fn replace_criterion_rejects_foreign_partition(
            base in arb_timeline(),
            other in arb_timeline(),
            index in 0usize..9,
        ) {
            let agg = bundle(CaseTrack::Disability, &base);
            let kind = CaseTrack::Disability.criteria()[index];
            let replacement = plain(kind, &other);
            let same = replacement.partition() == agg.partition();
            match agg.replace_criterion(replacement) {
                Ok(next) => {
                    prop_assert!(same);
                    prop_assert_eq!(next.partition(), agg.partition());
                }
                Err(err) => {
                    prop_assert!(!same);
                    prop_assert!(err.is_fatal());
                    let is_mismatch = matches!(err, AggregateError::PartitionMismatch { .. });
                    prop_assert!(is_mismatch);
                }
            }
        }
    }
}
