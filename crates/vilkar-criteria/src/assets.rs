//! # Assets Threshold Evaluator ("formue")
//!
//! The assets criterion is the only criterion whose verdict the engine
//! computes from figures: the summed asset components are compared with
//! the asset limit in force for every month of the basis period.
//!
//! ## Rules
//!
//! - Approved iff the sum is at most the limit in **every** month.
//! - A basis flagged `needs_more_information` is Undetermined, before any
//!   limit lookup.
//! - A month the rate table does not cover is an error, never a default.
//!
//! Moving an assets criterion to a new period is only defined for a
//! single assessment period, because the verdict is recomputed from its
//! one basis record.

use vilkar_core::{complement, minimal_covering_partition, CriterionKind, Period, Timestamp};
use vilkar_sats::{AssetLimitTable, SatsError};

use crate::assessment::{AssessedPeriods, Assessment, AssessmentPeriod};
use crate::basis::{AssetsBasis, Basis};
use crate::error::CriterionError;
use crate::merge;
use crate::verdict::Verdict;

/// Evaluate an assets basis against the limits in force.
pub fn evaluate(basis: &AssetsBasis, limits: &AssetLimitTable) -> Result<Verdict, SatsError> {
    if basis.needs_more_information {
        return Ok(Verdict::Undetermined);
    }
    let total = basis.total();
    for month in basis.period().months() {
        if total > limits.limit_for(month)? {
            return Ok(Verdict::Denied);
        }
    }
    Ok(Verdict::Approved)
}

/// Assessment period for `basis` with its evaluated verdict.
pub fn assess(
    created_at: Timestamp,
    basis: AssetsBasis,
    limits: &AssetLimitTable,
) -> Result<AssessmentPeriod<AssetsBasis>, CriterionError> {
    let verdict = evaluate(&basis, limits)?;
    AssessmentPeriod::new(created_at, basis.period(), verdict, Some(basis))
}

/// Assessed criterion from one or more bases.
pub fn assess_all(
    created_at: Timestamp,
    bases: Vec<AssetsBasis>,
    limits: &AssetLimitTable,
) -> Result<Assessment<AssetsBasis>, CriterionError> {
    let periods = bases
        .into_iter()
        .map(|b| assess(created_at, b, limits))
        .collect::<Result<Vec<_>, _>>()?;
    Assessment::assessed(periods)
}

/// Move the criterion onto `target`, re-evaluating the verdict.
///
/// # Errors
///
/// - [`CriterionError::MultiplePeriodsNotReconcilable`] unless exactly one
///   assessment period exists.
/// - [`CriterionError::MissingBasis`] if that period has no basis.
/// - [`CriterionError::RateTable`] if the limits do not cover `target`.
pub fn update_period(
    assessment: &Assessment<AssetsBasis>,
    target: Period,
    limits: &AssetLimitTable,
) -> Result<Assessment<AssetsBasis>, CriterionError> {
    let periods = match assessment {
        Assessment::Unassessed => return Ok(Assessment::Unassessed),
        Assessment::Assessed(periods) => periods,
    };
    let only = match periods.as_slice() {
        [only] => only,
        many => {
            return Err(CriterionError::MultiplePeriodsNotReconcilable {
                kind: CriterionKind::Assets,
                count: many.len(),
            })
        }
    };
    let basis = only.basis().ok_or(CriterionError::MissingBasis {
        kind: CriterionKind::Assets,
        period: only.period(),
    })?;
    let moved = basis.with_period(target);
    let verdict = evaluate(&moved, limits)?;
    let updated = AssessmentPeriod::try_new(
        only.id(),
        only.created_at(),
        target,
        verdict,
        Some(moved),
    )?;
    Ok(Assessment::Assessed(AssessedPeriods::single(updated)))
}

/// Drop spouse components inside `mask` and re-evaluate those months.
///
/// Used when the household no longer has a spouse for part of the
/// period. Assessment periods straddling the mask are split.
pub fn remove_spouse_assets(
    assessment: &Assessment<AssetsBasis>,
    mask: &[Period],
    limits: &AssetLimitTable,
) -> Result<Assessment<AssetsBasis>, CriterionError> {
    map_within(assessment, mask, |piece| {
        let basis = match piece.basis() {
            Some(b) if b.spouse.is_some() => b.without_spouse(),
            _ => return Ok(piece.clone()),
        };
        let verdict = evaluate(&basis, limits)?;
        piece.with_basis(basis, verdict)
    })
}

/// Add zeroed spouse components inside `mask` where none were recorded.
///
/// The sum is unchanged, so verdicts are kept.
pub fn add_empty_spouse_assets_if_missing(
    assessment: &Assessment<AssetsBasis>,
    mask: &[Period],
) -> Result<Assessment<AssetsBasis>, CriterionError> {
    map_within(assessment, mask, |piece| match piece.basis() {
        Some(b) if b.spouse.is_none() => {
            piece.with_basis(b.with_empty_spouse_if_missing(), piece.verdict())
        }
        _ => Ok(piece.clone()),
    })
}

/// Split every assessment period at the mask boundaries, transform the
/// pieces inside the mask, and merge the result.
fn map_within<F>(
    assessment: &Assessment<AssetsBasis>,
    mask: &[Period],
    mut f: F,
) -> Result<Assessment<AssetsBasis>, CriterionError>
where
    F: FnMut(&AssessmentPeriod<AssetsBasis>) -> Result<AssessmentPeriod<AssetsBasis>, CriterionError>,
{
    let periods = match assessment {
        Assessment::Unassessed => return Ok(Assessment::Unassessed),
        Assessment::Assessed(periods) => periods,
    };
    let mask = minimal_covering_partition(mask);
    let mut out = Vec::with_capacity(periods.len());
    for ap in periods {
        if !mask.iter().any(|m| m.overlaps(&ap.period())) {
            out.push(ap.clone());
            continue;
        }
        for inside in mask.iter().filter_map(|m| m.intersection(&ap.period())) {
            let piece = if inside == ap.period() {
                ap.clone()
            } else {
                ap.with_period(inside)
            };
            out.push(f(&piece)?);
        }
        for outside in complement(&ap.period(), &mask) {
            out.push(ap.with_period(outside));
        }
    }
    let split = AssessedPeriods::try_new(out)?;
    Ok(Assessment::Assessed(merge::merge(&split)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::fixtures::*;
    use crate::basis::AssetValues;

    fn cash(amount: u64) -> AssetValues {
        AssetValues {
            cash: amount,
            ..AssetValues::default()
        }
    }

    fn basis(period: Period, applicant: u64, spouse: Option<u64>) -> AssetsBasis {
        AssetsBasis::new(ts(), period, cash(applicant), spouse.map(cash))
    }

    fn limits_2021() -> AssetLimitTable {
        AssetLimitTable::flat(months(2021, 1, 2022, 12), 60_000)
    }

    #[test]
    fn at_limit_is_approved() {
        let b = basis(year(2021), 60_000, None);
        assert_eq!(evaluate(&b, &limits_2021()).unwrap(), Verdict::Approved);
    }

    #[test]
    fn above_limit_is_denied() {
        let b = basis(year(2021), 50_000, Some(10_001));
        assert_eq!(evaluate(&b, &limits_2021()).unwrap(), Verdict::Denied);
    }

    #[test]
    fn one_month_over_limit_denies_whole_period() {
        let table = AssetLimitTable::from_monthly_limits(
            year(2021)
                .months()
                .into_iter()
                .map(|m| (m, if m.month() >= 5 { 53_200 } else { 50_676 })),
        )
        .unwrap();
        let b = basis(year(2021), 52_000, None);
        assert_eq!(evaluate(&b, &table).unwrap(), Verdict::Denied);
        let may_onwards = basis(months(2021, 5, 2021, 12), 52_000, None);
        assert_eq!(evaluate(&may_onwards, &table).unwrap(), Verdict::Approved);
    }

    #[test]
    fn needs_more_information_short_circuits() {
        let b = basis(year(2030), 1_000_000, None).needing_more_information();
        // The table does not cover 2030, but no lookup happens.
        assert_eq!(evaluate(&b, &limits_2021()).unwrap(), Verdict::Undetermined);
    }

    #[test]
    fn uncovered_month_fails_fast() {
        let b = basis(months(2022, 6, 2023, 1), 0, None);
        assert!(matches!(
            evaluate(&b, &limits_2021()),
            Err(SatsError::MonthNotCovered { .. })
        ));
    }

    #[test]
    fn update_period_reevaluates_against_new_months() {
        let table = AssetLimitTable::from_monthly_limits(
            months(2021, 1, 2022, 12)
                .months()
                .into_iter()
                .map(|m| (m, if m.year() == 2021 { 60_000 } else { 40_000 })),
        )
        .unwrap();
        let a = assess_all(ts(), vec![basis(year(2021), 50_000, None)], &table).unwrap();
        assert_eq!(a.verdict(), Verdict::Approved);

        let moved = update_period(&a, months(2021, 6, 2022, 5), &table).unwrap();
        assert_eq!(moved.periods(), vec![months(2021, 6, 2022, 5)]);
        assert_eq!(moved.verdict(), Verdict::Denied);
        let only = moved.assessed_periods().unwrap().iter().next().unwrap();
        assert_eq!(only.basis().unwrap().period(), months(2021, 6, 2022, 5));
        let original = a.assessed_periods().unwrap().iter().next().unwrap();
        assert_eq!(only.id(), original.id());
    }

    #[test]
    fn update_period_keeps_undetermined_flag() {
        let b = basis(year(2021), 0, None).needing_more_information();
        let a = assess_all(ts(), vec![b], &limits_2021()).unwrap();
        let moved = update_period(&a, year(2022), &limits_2021()).unwrap();
        assert_eq!(moved.verdict(), Verdict::Undetermined);
    }

    #[test]
    fn update_period_rejects_multiple_periods() {
        let a = assess_all(
            ts(),
            vec![
                basis(months(2021, 1, 2021, 6), 0, None),
                basis(months(2021, 7, 2021, 12), 1, None),
            ],
            &limits_2021(),
        )
        .unwrap();
        let err = update_period(&a, year(2022), &limits_2021()).unwrap_err();
        assert!(matches!(
            err,
            CriterionError::MultiplePeriodsNotReconcilable { kind: CriterionKind::Assets, count: 2 }
        ));
    }

    #[test]
    fn update_period_requires_basis() {
        let a = Assessment::assessed(vec![AssessmentPeriod::<AssetsBasis>::without_basis(
            ts(),
            year(2021),
            Verdict::Approved,
        )])
        .unwrap();
        assert!(matches!(
            update_period(&a, year(2022), &limits_2021()),
            Err(CriterionError::MissingBasis { .. })
        ));
    }

    #[test]
    fn remove_spouse_assets_splits_by_mask() {
        let a = assess_all(ts(), vec![basis(months(2021, 1, 2021, 5), 40_000, Some(30_000))], &limits_2021())
            .unwrap();
        assert_eq!(a.verdict(), Verdict::Denied);

        let mask = [months(2021, 2, 2021, 3), months(2021, 5, 2021, 5)];
        let without = remove_spouse_assets(&a, &mask, &limits_2021()).unwrap();
        let got: Vec<_> = without
            .assessed_periods()
            .unwrap()
            .iter()
            .map(|p| (p.period(), p.verdict(), p.basis().unwrap().spouse.is_some()))
            .collect();
        assert_eq!(
            got,
            vec![
                (months(2021, 1, 2021, 1), Verdict::Denied, true),
                (months(2021, 2, 2021, 3), Verdict::Approved, false),
                (months(2021, 4, 2021, 4), Verdict::Denied, true),
                (months(2021, 5, 2021, 5), Verdict::Approved, false),
            ]
        );
    }

    #[test]
    fn remove_spouse_assets_outside_period_is_noop() {
        let a = assess_all(ts(), vec![basis(year(2021), 1, Some(1))], &limits_2021()).unwrap();
        let same = remove_spouse_assets(&a, &[year(2022)], &limits_2021()).unwrap();
        assert_eq!(same, a);
    }

    #[test]
    fn add_empty_spouse_assets_keeps_verdict_and_merges() {
        let a = assess_all(ts(), vec![basis(year(2021), 10, None)], &limits_2021()).unwrap();
        let filled = add_empty_spouse_assets_if_missing(&a, &[year(2021)]).unwrap();
        assert_eq!(filled.periods(), vec![year(2021)]);
        assert_eq!(filled.verdict(), Verdict::Approved);
        let only = filled.assessed_periods().unwrap().iter().next().unwrap();
        assert_eq!(only.basis().unwrap().spouse, Some(AssetValues::default()));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::basis::fixtures::*;
    use crate::basis::AssetValues;
    use proptest::prelude::*;

    fn arb_values() -> impl Strategy<Value = AssetValues> {
        (
            0u64..40_000,
            0u64..40_000,
            0u64..40_000,
            0u64..40_000,
            0u64..40_000,
            0u64..40_000,
            0u64..40_000,
            0u64..20_000,
        )
            .prop_map(|(a, b, c, d, e, f, g, h)| AssetValues {
                non_primary_residence: a,
                real_estate: b,
                vehicles: c,
                bank_deposits: d,
                securities: e,
                money_owed: f,
                cash: g,
                rent_deposit_account: h,
            })
    }

    // Rent deposit is a deduction, so it is excluded from the increasing
    // components.
    fn bump(values: AssetValues, component: usize, by: u64) -> AssetValues {
        let mut v = values;
        match component {
            0 => v.non_primary_residence += by,
            1 => v.real_estate += by,
            2 => v.vehicles += by,
            3 => v.bank_deposits += by,
            4 => v.securities += by,
            5 => v.money_owed += by,
            _ => v.cash += by,
        }
        v
    }

    proptest! {
        #[test]
        fn evaluation_is_monotonic(
            values in arb_values(),
            component in 0usize..7,
            by in 0u64..100_000,
            limit in 0u64..200_000,
        ) {
            let table = AssetLimitTable::flat(year(2021), limit);
            let before = AssetsBasis::new(ts(), year(2021), values, None);
            let after = AssetsBasis::new(ts(), year(2021), bump(values, component, by), None);
            let v1 = evaluate(&before, &table).unwrap();
            let v2 = evaluate(&after, &table).unwrap();
            prop_assert!(v2 <= v1, "{:?} -> {:?}", v1, v2);
        }
    }
}
