//! # Criterion — Closed Set of Eligibility Criteria
//!
//! [`Criterion`] is a tagged union with one variant per [`CriterionKind`],
//! each carrying an [`Assessment`] over that kind's basis record type.
//! Operations that behave the same for every kind dispatch through
//! [`for_each_kind!`]; the assets criterion's period update is the one
//! operation with kind-specific behavior.

use chrono::NaiveDate;
use serde::Serialize;
use vilkar_core::{AssessmentId, CriterionKind, Period, Timestamp};
use vilkar_sats::AssetLimitTable;

use crate::assessment::{Assessment, AssessmentPeriod};
use crate::assets;
use crate::basis::{
    AssetsBasis, Basis, DisabilityBasis, DisclosureDutyBasis, ForeignStayBasis, NoBasis, PensionBasis,
    PensionCheck, PersonalAttendanceBasis,
};
use crate::error::CriterionError;
use crate::verdict::Verdict;

/// One eligibility criterion with its assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "assessment", rename_all = "snake_case")]
pub enum Criterion {
    Disability(Assessment<DisabilityBasis>),
    Assets(Assessment<AssetsBasis>),
    RefugeeStatus(Assessment<NoBasis>),
    LawfulStay(Assessment<NoBasis>),
    InstitutionalStay(Assessment<NoBasis>),
    ForeignStay(Assessment<ForeignStayBasis>),
    PersonalAttendance(Assessment<PersonalAttendanceBasis>),
    FixedResidenceInNorway(Assessment<NoBasis>),
    DisclosureDuty(Assessment<DisclosureDutyBasis>),
    FamilyReunification(Assessment<NoBasis>),
    Pension(Assessment<PensionBasis>),
}

/// Evaluate `$body` with `$a` bound to the inner assessment of any variant.
///
/// With `map`, the result is rewrapped in the same variant.
macro_rules! for_each_kind {
    ($value:expr, |$a:ident| $body:expr) => {
        match $value {
            Criterion::Disability($a) => $body,
            Criterion::Assets($a) => $body,
            Criterion::RefugeeStatus($a) => $body,
            Criterion::LawfulStay($a) => $body,
            Criterion::InstitutionalStay($a) => $body,
            Criterion::ForeignStay($a) => $body,
            Criterion::PersonalAttendance($a) => $body,
            Criterion::FixedResidenceInNorway($a) => $body,
            Criterion::DisclosureDuty($a) => $body,
            Criterion::FamilyReunification($a) => $body,
            Criterion::Pension($a) => $body,
        }
    };
    (map $value:expr, |$a:ident| $body:expr) => {
        match $value {
            Criterion::Disability($a) => Criterion::Disability($body),
            Criterion::Assets($a) => Criterion::Assets($body),
            Criterion::RefugeeStatus($a) => Criterion::RefugeeStatus($body),
            Criterion::LawfulStay($a) => Criterion::LawfulStay($body),
            Criterion::InstitutionalStay($a) => Criterion::InstitutionalStay($body),
            Criterion::ForeignStay($a) => Criterion::ForeignStay($body),
            Criterion::PersonalAttendance($a) => Criterion::PersonalAttendance($body),
            Criterion::FixedResidenceInNorway($a) => Criterion::FixedResidenceInNorway($body),
            Criterion::DisclosureDuty($a) => Criterion::DisclosureDuty($body),
            Criterion::FamilyReunification($a) => Criterion::FamilyReunification($body),
            Criterion::Pension($a) => Criterion::Pension($body),
        }
    };
}

impl Criterion {
    /// The unassessed criterion of `kind`.
    pub fn unassessed(kind: CriterionKind) -> Self {
        match kind {
            CriterionKind::Disability => Self::Disability(Assessment::Unassessed),
            CriterionKind::Assets => Self::Assets(Assessment::Unassessed),
            CriterionKind::RefugeeStatus => Self::RefugeeStatus(Assessment::Unassessed),
            CriterionKind::LawfulStay => Self::LawfulStay(Assessment::Unassessed),
            CriterionKind::InstitutionalStay => Self::InstitutionalStay(Assessment::Unassessed),
            CriterionKind::ForeignStay => Self::ForeignStay(Assessment::Unassessed),
            CriterionKind::PersonalAttendance => Self::PersonalAttendance(Assessment::Unassessed),
            CriterionKind::FixedResidenceInNorway => {
                Self::FixedResidenceInNorway(Assessment::Unassessed)
            }
            CriterionKind::DisclosureDuty => Self::DisclosureDuty(Assessment::Unassessed),
            CriterionKind::FamilyReunification => {
                Self::FamilyReunification(Assessment::Unassessed)
            }
            CriterionKind::Pension => Self::Pension(Assessment::Unassessed),
        }
    }

    /// Caseworker verdicts with no basis records, one per period.
    ///
    /// # Errors
    ///
    /// [`CriterionError::EmptyAssessment`] for no verdicts and
    /// [`CriterionError::OverlappingPeriods`] if two periods overlap.
    pub fn from_verdicts(
        kind: CriterionKind,
        created_at: Timestamp,
        verdicts: &[(Period, Verdict)],
    ) -> Result<Self, CriterionError> {
        fn build<B: Basis>(
            created_at: Timestamp,
            verdicts: &[(Period, Verdict)],
        ) -> Result<Assessment<B>, CriterionError> {
            Assessment::assessed(
                verdicts
                    .iter()
                    .map(|(period, verdict)| {
                        AssessmentPeriod::without_basis(created_at, *period, *verdict)
                    })
                    .collect(),
            )
        }

        Ok(match kind {
            CriterionKind::Disability => Self::Disability(build(created_at, verdicts)?),
            CriterionKind::Assets => Self::Assets(build(created_at, verdicts)?),
            CriterionKind::RefugeeStatus => Self::RefugeeStatus(build(created_at, verdicts)?),
            CriterionKind::LawfulStay => Self::LawfulStay(build(created_at, verdicts)?),
            CriterionKind::InstitutionalStay => {
                Self::InstitutionalStay(build(created_at, verdicts)?)
            }
            CriterionKind::ForeignStay => Self::ForeignStay(build(created_at, verdicts)?),
            CriterionKind::PersonalAttendance => {
                Self::PersonalAttendance(build(created_at, verdicts)?)
            }
            CriterionKind::FixedResidenceInNorway => {
                Self::FixedResidenceInNorway(build(created_at, verdicts)?)
            }
            CriterionKind::DisclosureDuty => Self::DisclosureDuty(build(created_at, verdicts)?),
            CriterionKind::FamilyReunification => {
                Self::FamilyReunification(build(created_at, verdicts)?)
            }
            CriterionKind::Pension => Self::Pension(build(created_at, verdicts)?),
        })
    }

    pub fn kind(&self) -> CriterionKind {
        match self {
            Self::Disability(_) => CriterionKind::Disability,
            Self::Assets(_) => CriterionKind::Assets,
            Self::RefugeeStatus(_) => CriterionKind::RefugeeStatus,
            Self::LawfulStay(_) => CriterionKind::LawfulStay,
            Self::InstitutionalStay(_) => CriterionKind::InstitutionalStay,
            Self::ForeignStay(_) => CriterionKind::ForeignStay,
            Self::PersonalAttendance(_) => CriterionKind::PersonalAttendance,
            Self::FixedResidenceInNorway(_) => CriterionKind::FixedResidenceInNorway,
            Self::DisclosureDuty(_) => CriterionKind::DisclosureDuty,
            Self::FamilyReunification(_) => CriterionKind::FamilyReunification,
            Self::Pension(_) => CriterionKind::Pension,
        }
    }

    pub fn verdict(&self) -> Verdict {
        for_each_kind!(self, |a| a.verdict())
    }

    pub fn is_assessed(&self) -> bool {
        for_each_kind!(self, |a| a.is_assessed())
    }

    pub fn assessment_period_count(&self) -> usize {
        for_each_kind!(self, |a| a.assessment_period_count())
    }

    /// Period of every assessment period, in order.
    pub fn periods(&self) -> Vec<Period> {
        for_each_kind!(self, |a| a.periods())
    }

    /// Ids of every assessment period, in order.
    pub fn assessment_ids(&self) -> Vec<AssessmentId> {
        for_each_kind!(self, |a| a
            .assessed_periods()
            .map(|periods| periods.iter().map(AssessmentPeriod::id).collect())
            .unwrap_or_default())
    }

    /// Maximal contiguous spans covered; compared across an aggregate.
    pub fn partition(&self) -> Vec<Period> {
        for_each_kind!(self, |a| a.partition())
    }

    pub fn covering_period(&self) -> Option<Period> {
        for_each_kind!(self, |a| a.covering_period())
    }

    /// First day of the earliest denied assessment period.
    pub fn earliest_denial_date(&self) -> Option<NaiveDate> {
        for_each_kind!(self, |a| a.earliest_denial_date())
    }

    /// Pension sub-checks failed in any denied assessment period.
    ///
    /// Empty for every other kind.
    pub fn failed_pension_checks(&self) -> Vec<PensionCheck> {
        let Self::Pension(Assessment::Assessed(periods)) = self else {
            return Vec::new();
        };
        let mut checks: Vec<PensionCheck> = periods
            .iter()
            .filter(|p| p.verdict().is_denied())
            .filter_map(|p| p.basis())
            .flat_map(PensionBasis::failed_checks)
            .collect();
        checks.sort();
        checks.dedup();
        checks
    }

    /// Same kind and equivalent assessments, ignoring ids and timestamps.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Disability(a), Self::Disability(b)) => a.is_equivalent(b),
            (Self::Assets(a), Self::Assets(b)) => a.is_equivalent(b),
            (Self::RefugeeStatus(a), Self::RefugeeStatus(b)) => a.is_equivalent(b),
            (Self::LawfulStay(a), Self::LawfulStay(b)) => a.is_equivalent(b),
            (Self::InstitutionalStay(a), Self::InstitutionalStay(b)) => a.is_equivalent(b),
            (Self::ForeignStay(a), Self::ForeignStay(b)) => a.is_equivalent(b),
            (Self::PersonalAttendance(a), Self::PersonalAttendance(b)) => a.is_equivalent(b),
            (Self::FixedResidenceInNorway(a), Self::FixedResidenceInNorway(b)) => {
                a.is_equivalent(b)
            }
            (Self::DisclosureDuty(a), Self::DisclosureDuty(b)) => a.is_equivalent(b),
            (Self::FamilyReunification(a), Self::FamilyReunification(b)) => a.is_equivalent(b),
            (Self::Pension(a), Self::Pension(b)) => a.is_equivalent(b),
            _ => false,
        }
    }

    /// Restrict to `period` without extending.
    pub fn clip_to(&self, period: Period) -> Self {
        for_each_kind!(map self, |a| a.clip_to(period))
    }

    /// Coalesce adjacent equivalent assessment periods.
    pub fn merge_equal_periods(&self) -> Self {
        for_each_kind!(map self, |a| a.merge_equal_periods())
    }

    pub fn copy_with_new_ids(&self) -> Self {
        for_each_kind!(map self, |a| a.copy_with_new_ids())
    }

    /// Re-partition to exactly cover `target`.
    ///
    /// Kinds that allow several assessment periods use the
    /// stretch-nearest-neighbour reconciliation. Assets is moved as a
    /// single period and re-evaluated against `limits`.
    ///
    /// # Errors
    ///
    /// [`CriterionError::MultiplePeriodsNotReconcilable`] when the kind
    /// forbids reconciling several periods and more than one exists.
    pub fn reconcile(&self, target: Period, limits: &AssetLimitTable) -> Result<Self, CriterionError> {
        let kind = self.kind();
        let count = self.assessment_period_count();
        if count > 1 && !kind.allows_multi_period_reconciliation() {
            return Err(CriterionError::MultiplePeriodsNotReconcilable { kind, count });
        }
        match self {
            Self::Assets(a) => Ok(Self::Assets(assets::update_period(a, target, limits)?)),
            other => Ok(for_each_kind!(map other, |a| a.reconcile(target))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::fixtures::*;
    use crate::basis::{AssetValues, PensionClaim};

    fn no_basis(period: Period, verdict: Verdict) -> Assessment<NoBasis> {
        Assessment::assessed(vec![AssessmentPeriod::without_basis(ts(), period, verdict)]).unwrap()
    }

    #[test]
    fn unassessed_matches_kind_for_every_kind() {
        for kind in CriterionKind::all() {
            let c = Criterion::unassessed(*kind);
            assert_eq!(c.kind(), *kind);
            assert_eq!(c.verdict(), Verdict::Undetermined);
            assert!(!c.is_assessed());
            assert!(c.periods().is_empty());
        }
    }

    #[test]
    fn pension_reports_failed_sub_checks() {
        let basis = PensionBasis::new(
            ts(),
            year(2021),
            PensionClaim::NotApplied,
            PensionClaim::Applied,
            PensionClaim::NotApplied,
        );
        let c = Criterion::Pension(
            Assessment::assessed(vec![AssessmentPeriod::from_basis(ts(), basis)]).unwrap(),
        );
        assert_eq!(c.verdict(), Verdict::Denied);
        assert_eq!(
            c.failed_pension_checks(),
            vec![PensionCheck::NationalOldAgePension, PensionCheck::ForeignSchemes]
        );
        assert!(Criterion::unassessed(CriterionKind::Assets)
            .failed_pension_checks()
            .is_empty());
    }

    #[test]
    fn from_verdicts_builds_every_kind() {
        for kind in CriterionKind::all() {
            let c = Criterion::from_verdicts(*kind, ts(), &[(year(2021), Verdict::Denied)]).unwrap();
            assert_eq!(c.kind(), *kind);
            assert_eq!(c.verdict(), Verdict::Denied);
            assert_eq!(c.earliest_denial_date(), NaiveDate::from_ymd_opt(2021, 1, 1));
        }
        let empty = Criterion::from_verdicts(CriterionKind::Pension, ts(), &[]);
        assert!(matches!(empty, Err(CriterionError::EmptyAssessment)));
    }

    #[test]
    fn equivalence_requires_same_kind() {
        let a = Criterion::LawfulStay(no_basis(year(2021), Verdict::Approved));
        let b = Criterion::RefugeeStatus(no_basis(year(2021), Verdict::Approved));
        assert!(!a.is_equivalent(&b));
        assert!(a.is_equivalent(&a.copy_with_new_ids()));
    }

    #[test]
    fn reconcile_generic_kind() {
        let c = Criterion::LawfulStay(no_basis(year(2021), Verdict::Approved));
        let limits = AssetLimitTable::flat(year(2021), 0);
        let r = c.reconcile(months(2021, 6, 2022, 5), &limits).unwrap();
        assert_eq!(r.periods(), vec![months(2021, 6, 2022, 5)]);
        assert_eq!(r.verdict(), Verdict::Approved);
    }

    #[test]
    fn reconcile_assets_with_two_periods_fails() {
        let limits = AssetLimitTable::flat(year(2021), 60_000);
        let a = assets::assess_all(
            ts(),
            vec![
                AssetsBasis::new(ts(), months(2021, 1, 2021, 6), AssetValues::default(), None),
                AssetsBasis::new(ts(), months(2021, 7, 2021, 12), AssetValues::default(), Some(AssetValues::default())),
            ],
            &limits,
        )
        .unwrap();
        let err = Criterion::Assets(a)
            .reconcile(year(2021), &limits)
            .unwrap_err();
        assert!(matches!(err, CriterionError::MultiplePeriodsNotReconcilable { count: 2, .. }));
    }

    #[test]
    fn unassessed_reconciles_to_unassessed() {
        let limits = AssetLimitTable::flat(year(2021), 0);
        for kind in CriterionKind::all() {
            let r = Criterion::unassessed(*kind).reconcile(year(2021), &limits).unwrap();
            assert!(!r.is_assessed());
        }
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(Criterion::unassessed(CriterionKind::FixedResidenceInNorway))
            .unwrap();
        assert_eq!(json["kind"], "fixed_residence_in_norway");
        assert_eq!(json["assessment"]["status"], "unassessed");
    }
}
