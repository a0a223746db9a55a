//! # Period Merge ("slå sammen like perioder")
//!
//! Coalesces adjacent assessment periods with equal verdict and equal
//! basis facts into one wider period. Keeps the persisted representation
//! minimal after repeated reconciliations.

use crate::assessment::{AssessedPeriods, AssessmentPeriod};
use crate::basis::Basis;

/// Single left-to-right fold over ordered periods.
///
/// When the next period is adjacent to and equivalent with the last one
/// accumulated, the last is replaced by one spanning both (new id,
/// superseding basis). Otherwise the next period is appended unchanged.
/// The result covers the same span and is idempotent under `==`.
pub fn merge<B: Basis>(periods: &AssessedPeriods<B>) -> AssessedPeriods<B> {
    let mut acc: Vec<AssessmentPeriod<B>> = Vec::with_capacity(periods.len());
    for next in periods {
        let widened = acc.last().and_then(|last| {
            if !last.is_adjacent_and_equivalent(next) {
                return None;
            }
            last.period()
                .merge(&next.period())
                .map(|span| last.with_period(span))
        });
        match widened {
            Some(w) => {
                acc.pop();
                acc.push(w);
            }
            None => acc.push(next.clone()),
        }
    }
    AssessedPeriods::from_sorted(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::fixtures::*;
    use crate::basis::{AssetValues, AssetsBasis, NoBasis};
    use crate::verdict::Verdict;
    use vilkar_core::Period;

    fn ap(period: Period, verdict: Verdict) -> AssessmentPeriod<NoBasis> {
        AssessmentPeriod::without_basis(ts(), period, verdict)
    }

    fn assets(period: Period, cash: u64) -> AssessmentPeriod<AssetsBasis> {
        let basis = AssetsBasis::new(
            ts(),
            period,
            AssetValues {
                cash,
                ..AssetValues::default()
            },
            None,
        );
        AssessmentPeriod::new(ts(), period, Verdict::Approved, Some(basis)).unwrap()
    }

    #[test]
    fn adjacent_equal_periods_collapse() {
        let x = AssessedPeriods::try_new(vec![
            assets(months(2021, 1, 2021, 6), 100),
            assets(months(2021, 7, 2021, 12), 100),
        ])
        .unwrap();
        let merged = merge(&x);
        assert_eq!(merged.periods(), vec![year(2021)]);
        let only = merged.iter().next().unwrap();
        assert_eq!(only.basis().unwrap().period(), year(2021));
    }

    #[test]
    fn different_basis_does_not_collapse() {
        let x = AssessedPeriods::try_new(vec![
            assets(months(2021, 1, 2021, 6), 100),
            assets(months(2021, 7, 2021, 12), 200),
        ])
        .unwrap();
        assert_eq!(merge(&x), x);
    }

    #[test]
    fn gap_prevents_merge() {
        let x = AssessedPeriods::try_new(vec![
            ap(months(2021, 1, 2021, 3), Verdict::Approved),
            ap(months(2021, 5, 2021, 6), Verdict::Approved),
        ])
        .unwrap();
        assert_eq!(merge(&x), x);
    }

    #[test]
    fn runs_collapse_left_to_right() {
        let x = AssessedPeriods::try_new(vec![
            ap(months(2021, 1, 2021, 2), Verdict::Approved),
            ap(months(2021, 3, 2021, 4), Verdict::Approved),
            ap(months(2021, 5, 2021, 6), Verdict::Approved),
            ap(months(2021, 7, 2021, 8), Verdict::Denied),
            ap(months(2021, 9, 2021, 12), Verdict::Denied),
        ])
        .unwrap();
        let merged = merge(&x);
        assert_eq!(
            merged.periods(),
            vec![months(2021, 1, 2021, 6), months(2021, 7, 2021, 12)]
        );
    }

    #[test]
    fn merge_is_idempotent() {
        let x = AssessedPeriods::try_new(vec![
            ap(months(2021, 1, 2021, 6), Verdict::Approved),
            ap(months(2021, 7, 2021, 12), Verdict::Approved),
        ])
        .unwrap();
        let once = merge(&x);
        assert_eq!(merge(&once), once);
    }
}
