//! # Timeline Reconciliation ("tidslinje")
//!
//! Re-partitions a criterion's assessment periods to exactly cover a
//! target period. Splitting and clipping are generic. Deciding which
//! existing verdict fills a gap is a product policy expressed through
//! [`GapFillStrategy`]; the policy in force is [`StretchNearestNeighbour`].
//!
//! ## Algorithm
//!
//! 1. Clip every assessment period that overlaps the target to the
//!    intersection. Basis records are re-periodized with it.
//! 2. If nothing overlaps, ask the strategy for the single period to
//!    extend over the whole target.
//! 3. Otherwise fill each uncovered gap of the target with a copy of the
//!    period the strategy picks, re-periodized to the gap.
//! 4. Merge adjacent equivalent periods.
//!
//! The result always covers exactly the target: no gaps, no overflow.

use vilkar_core::{complement, Period};

use crate::assessment::{AssessedPeriods, AssessmentPeriod};
use crate::basis::Basis;
use crate::merge;

/// Policy choosing which existing assessment period supplies the verdict
/// for months the criterion has not been assessed for.
pub trait GapFillStrategy {
    /// Pick the donor for `gap` among `clipped`, the assessment periods
    /// already inside the target. `clipped` is sorted and non-empty.
    fn donor_for_gap<'a, B: Basis>(
        &self,
        gap: Period,
        clipped: &'a [AssessmentPeriod<B>],
    ) -> Option<&'a AssessmentPeriod<B>>;

    /// Pick the donor when `target` overlaps none of `all`. `all` is
    /// sorted and non-empty.
    fn donor_for_disjoint<'a, B: Basis>(
        &self,
        target: Period,
        all: &'a [AssessmentPeriod<B>],
    ) -> Option<&'a AssessmentPeriod<B>>;
}

/// Extend the nearest existing verdict over uncovered months.
///
/// - A gap is filled by the last period starting at or before it, or if
///   there is none, the first period starting after it.
/// - A target disjoint from every period is filled by the period with
///   the fewest months between it and the target. Ties go to the period
///   preceding the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct StretchNearestNeighbour;

impl GapFillStrategy for StretchNearestNeighbour {
    fn donor_for_gap<'a, B: Basis>(
        &self,
        gap: Period,
        clipped: &'a [AssessmentPeriod<B>],
    ) -> Option<&'a AssessmentPeriod<B>> {
        clipped
            .iter()
            .rev()
            .find(|p| p.period().from() <= gap.from())
            .or_else(|| clipped.iter().find(|p| p.period().from() >= gap.from()))
    }

    fn donor_for_disjoint<'a, B: Basis>(
        &self,
        target: Period,
        all: &'a [AssessmentPeriod<B>],
    ) -> Option<&'a AssessmentPeriod<B>> {
        all.iter().min_by_key(|p| {
            let follows_target = target.starts_before(&p.period());
            (p.period().months_between(&target), follows_target)
        })
    }
}

/// Restrict `periods` to `target` without filling gaps.
///
/// Periods already inside `target` are kept as they are. Periods that
/// straddle a boundary are replaced by a clipped copy with a new id.
pub fn clip<B: Basis>(periods: &[AssessmentPeriod<B>], target: Period) -> Vec<AssessmentPeriod<B>> {
    periods
        .iter()
        .filter_map(|p| {
            let inside = p.period().intersection(&target)?;
            if inside == p.period() {
                Some(p.clone())
            } else {
                Some(p.with_period(inside))
            }
        })
        .collect()
}

/// Reconcile onto `target` with the stretch-nearest-neighbour policy.
pub fn reconcile<B: Basis>(periods: &AssessedPeriods<B>, target: Period) -> AssessedPeriods<B> {
    reconcile_with(periods, target, &StretchNearestNeighbour)
}

/// Reconcile onto `target` with an explicit gap-fill policy.
pub fn reconcile_with<B: Basis, S: GapFillStrategy>(
    periods: &AssessedPeriods<B>,
    target: Period,
    strategy: &S,
) -> AssessedPeriods<B> {
    let clipped = clip(periods.as_slice(), target);

    if clipped.is_empty() {
        return match strategy.donor_for_disjoint(target, periods.as_slice()) {
            Some(donor) => {
                tracing::debug!(
                    donor = %donor.period(),
                    target = %target,
                    "extending nearest assessment period over disjoint target"
                );
                AssessedPeriods::single(donor.with_period(target))
            }
            // Strategy declined; fall back to the first period.
            None => {
                let fallback = periods.iter().next().map(|p| p.with_period(target));
                match fallback {
                    Some(p) => AssessedPeriods::single(p),
                    None => periods.clone(),
                }
            }
        };
    }

    let covered: Vec<Period> = clipped.iter().map(AssessmentPeriod::period).collect();
    let mut filled: Vec<AssessmentPeriod<B>> = Vec::with_capacity(clipped.len());
    for gap in complement(&target, &covered) {
        let donor = strategy
            .donor_for_gap(gap, &clipped)
            .or_else(|| clipped.first());
        if let Some(donor) = donor {
            tracing::debug!(
                donor = %donor.period(),
                gap = %gap,
                "filling uncovered months from nearest assessment period"
            );
            filled.push(donor.with_period(gap));
        }
    }

    let mut all = clipped;
    all.extend(filled);
    all.sort_by_key(AssessmentPeriod::period);
    merge::merge(&AssessedPeriods::from_sorted(all))
}
