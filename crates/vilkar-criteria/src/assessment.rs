//! # Assessment Periods ("vurderingsperioder")
//!
//! An [`AssessmentPeriod`] is the atomic unit a criterion is built from:
//! one period, one verdict, and optionally the basis record the verdict
//! rests on. An [`Assessment`] is either `Unassessed` or a non-empty,
//! chronologically ordered, non-overlapping list of assessment periods.
//!
//! ## Invariants
//!
//! - A basis record's period equals its assessment period's period.
//! - The periods of an assessed criterion never overlap.
//!
//! Both are enforced by the constructors; there is no way to build a
//! value that violates them.

use chrono::NaiveDate;
use serde::Serialize;
use vilkar_core::{minimal_covering_partition, min_and_max_of, AssessmentId, Period, Timestamp};

use crate::basis::{Basis, DerivesVerdict};
use crate::error::CriterionError;
use crate::merge;
use crate::timeline::{self, StretchNearestNeighbour};
use crate::verdict::Verdict;

// ---------------------------------------------------------------------------
// AssessmentPeriod
// ---------------------------------------------------------------------------

/// One verdict for one period, with the basis it rests on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentPeriod<B> {
    id: AssessmentId,
    created_at: Timestamp,
    period: Period,
    verdict: Verdict,
    basis: Option<B>,
}

impl<B: Basis> AssessmentPeriod<B> {
    /// Build an assessment period with a known id.
    ///
    /// # Errors
    ///
    /// [`CriterionError::BasisPeriodMismatch`] if `basis` covers a
    /// different period.
    pub fn try_new(
        id: AssessmentId,
        created_at: Timestamp,
        period: Period,
        verdict: Verdict,
        basis: Option<B>,
    ) -> Result<Self, CriterionError> {
        if let Some(b) = &basis {
            if b.period() != period {
                return Err(CriterionError::BasisPeriodMismatch {
                    assessment: period,
                    basis: b.period(),
                });
            }
        }
        Ok(Self {
            id,
            created_at,
            period,
            verdict,
            basis,
        })
    }

    /// Build an assessment period with a fresh id.
    pub fn new(
        created_at: Timestamp,
        period: Period,
        verdict: Verdict,
        basis: Option<B>,
    ) -> Result<Self, CriterionError> {
        Self::try_new(AssessmentId::new(), created_at, period, verdict, basis)
    }

    /// Caseworker verdict with no basis record.
    pub fn without_basis(created_at: Timestamp, period: Period, verdict: Verdict) -> Self {
        Self {
            id: AssessmentId::new(),
            created_at,
            period,
            verdict,
            basis: None,
        }
    }

    pub fn id(&self) -> AssessmentId {
        self.id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn basis(&self) -> Option<&B> {
        self.basis.as_ref()
    }

    /// Same verdict and facts over `period`, with a new id and a
    /// superseding basis record.
    pub fn with_period(&self, period: Period) -> Self {
        Self {
            id: AssessmentId::new(),
            created_at: self.created_at,
            period,
            verdict: self.verdict,
            basis: self.basis.as_ref().map(|b| b.with_period(period)),
        }
    }

    /// Replace the basis, keeping the id. The basis must cover the same period.
    pub(crate) fn with_basis(&self, basis: B, verdict: Verdict) -> Result<Self, CriterionError> {
        Self::try_new(self.id, self.created_at, self.period, verdict, Some(basis))
    }

    /// Same content under fresh ids.
    pub fn copy_with_new_id(&self) -> Self {
        Self {
            id: AssessmentId::new(),
            basis: self.basis.as_ref().map(Basis::with_new_id),
            ..self.clone()
        }
    }

    /// Verdict and basis facts agree. Ids, timestamps and periods are ignored.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.verdict == other.verdict
            && match (&self.basis, &other.basis) {
                (Some(a), Some(b)) => a.same_facts(b),
                (None, None) => true,
                _ => false,
            }
    }

    /// The periods touch with no gap and the content is equivalent.
    pub fn is_adjacent_and_equivalent(&self, other: &Self) -> bool {
        self.period.is_adjacent_to(&other.period) && self.is_equivalent(other)
    }
}

impl<B: DerivesVerdict> AssessmentPeriod<B> {
    /// Assessment period whose verdict follows from its basis.
    pub fn from_basis(created_at: Timestamp, basis: B) -> Self {
        Self {
            id: AssessmentId::new(),
            created_at,
            period: basis.period(),
            verdict: basis.derived_verdict(),
            basis: Some(basis),
        }
    }
}

// ---------------------------------------------------------------------------
// AssessedPeriods
// ---------------------------------------------------------------------------

/// Non-empty, ordered, non-overlapping assessment periods.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AssessedPeriods<B> {
    periods: Vec<AssessmentPeriod<B>>,
}

impl<B: Basis> AssessedPeriods<B> {
    /// Validate and sort assessment periods.
    ///
    /// # Errors
    ///
    /// [`CriterionError::EmptyAssessment`] for an empty list and
    /// [`CriterionError::OverlappingPeriods`] if any two periods share a
    /// month (which includes duplicates).
    pub fn try_new(mut periods: Vec<AssessmentPeriod<B>>) -> Result<Self, CriterionError> {
        if periods.is_empty() {
            return Err(CriterionError::EmptyAssessment);
        }
        periods.sort_by_key(|p| p.period);
        if let Some(w) = periods.windows(2).find(|w| w[0].period.overlaps(&w[1].period)) {
            return Err(CriterionError::OverlappingPeriods {
                first: w[0].period,
                second: w[1].period,
            });
        }
        Ok(Self { periods })
    }

    /// Wrap output of the engine, which already satisfies the invariants.
    pub(crate) fn from_sorted(periods: Vec<AssessmentPeriod<B>>) -> Self {
        debug_assert!(!periods.is_empty());
        debug_assert!(periods
            .windows(2)
            .all(|w| w[0].period < w[1].period && !w[0].period.overlaps(&w[1].period)));
        Self { periods }
    }

    pub fn single(period: AssessmentPeriod<B>) -> Self {
        Self {
            periods: vec![period],
        }
    }

    pub fn as_slice(&self) -> &[AssessmentPeriod<B>] {
        &self.periods
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssessmentPeriod<B>> {
        self.periods.iter()
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Always `false`; present for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn into_vec(self) -> Vec<AssessmentPeriod<B>> {
        self.periods
    }

    pub fn periods(&self) -> Vec<Period> {
        self.periods.iter().map(|p| p.period).collect()
    }

    /// All Approved → Approved; any Denied → Denied; else Undetermined.
    pub fn verdict(&self) -> Verdict {
        Verdict::meet_all(self.periods.iter().map(|p| p.verdict))
    }

    pub fn earliest_denial_date(&self) -> Option<NaiveDate> {
        self.periods
            .iter()
            .filter(|p| p.verdict.is_denied())
            .map(|p| p.period.from())
            .min()
    }

    /// Pairwise equivalence in order.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.periods.len() == other.periods.len()
            && self
                .periods
                .iter()
                .zip(&other.periods)
                .all(|(a, b)| a.period == b.period && a.is_equivalent(b))
    }

    pub fn copy_with_new_ids(&self) -> Self {
        Self {
            periods: self.periods.iter().map(AssessmentPeriod::copy_with_new_id).collect(),
        }
    }
}

impl<'a, B> IntoIterator for &'a AssessedPeriods<B> {
    type Item = &'a AssessmentPeriod<B>;
    type IntoIter = std::slice::Iter<'a, AssessmentPeriod<B>>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.iter()
    }
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// A criterion's state: not yet assessed, or assessed period by period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "periods", rename_all = "snake_case")]
pub enum Assessment<B> {
    Unassessed,
    Assessed(AssessedPeriods<B>),
}

impl<B: Basis> Assessment<B> {
    /// Validate a list of periods into an assessed criterion.
    pub fn assessed(periods: Vec<AssessmentPeriod<B>>) -> Result<Self, CriterionError> {
        AssessedPeriods::try_new(periods).map(Self::Assessed)
    }

    pub fn is_assessed(&self) -> bool {
        matches!(self, Self::Assessed(_))
    }

    pub fn assessed_periods(&self) -> Option<&AssessedPeriods<B>> {
        match self {
            Self::Unassessed => None,
            Self::Assessed(periods) => Some(periods),
        }
    }

    /// `Unassessed` always yields `Undetermined`.
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Unassessed => Verdict::Undetermined,
            Self::Assessed(periods) => periods.verdict(),
        }
    }

    pub fn assessment_period_count(&self) -> usize {
        self.assessed_periods().map_or(0, AssessedPeriods::len)
    }

    /// Periods of every assessment period, in order.
    pub fn periods(&self) -> Vec<Period> {
        self.assessed_periods()
            .map(AssessedPeriods::periods)
            .unwrap_or_default()
    }

    /// Maximal contiguous spans covered. Empty when unassessed.
    pub fn partition(&self) -> Vec<Period> {
        minimal_covering_partition(&self.periods())
    }

    pub fn covering_period(&self) -> Option<Period> {
        min_and_max_of(&self.periods())
    }

    pub fn earliest_denial_date(&self) -> Option<NaiveDate> {
        self.assessed_periods()
            .and_then(AssessedPeriods::earliest_denial_date)
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unassessed, Self::Unassessed) => true,
            (Self::Assessed(a), Self::Assessed(b)) => a.is_equivalent(b),
            _ => false,
        }
    }

    /// Restrict to `period` without extending.
    ///
    /// A criterion with nothing inside `period` becomes unassessed.
    pub fn clip_to(&self, period: Period) -> Self {
        match self {
            Self::Unassessed => Self::Unassessed,
            Self::Assessed(periods) => {
                let clipped = timeline::clip(periods.as_slice(), period);
                if clipped.is_empty() {
                    Self::Unassessed
                } else {
                    Self::Assessed(AssessedPeriods::from_sorted(clipped))
                }
            }
        }
    }

    /// Coalesce adjacent equivalent periods.
    pub fn merge_equal_periods(&self) -> Self {
        match self {
            Self::Unassessed => Self::Unassessed,
            Self::Assessed(periods) => Self::Assessed(merge::merge(periods)),
        }
    }

    /// Re-partition to exactly cover `target` using the
    /// stretch-nearest-neighbour policy. Unassessed stays unassessed.
    pub fn reconcile(&self, target: Period) -> Self {
        match self {
            Self::Unassessed => Self::Unassessed,
            Self::Assessed(periods) => Self::Assessed(timeline::reconcile_with(
                periods,
                target,
                &StretchNearestNeighbour,
            )),
        }
    }

    pub fn copy_with_new_ids(&self) -> Self {
        match self {
            Self::Unassessed => Self::Unassessed,
            Self::Assessed(periods) => Self::Assessed(periods.copy_with_new_ids()),
        }
    }
}
