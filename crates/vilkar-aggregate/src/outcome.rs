//! # Case Outcome ("vilkårsvurderingsresultat")
//!
//! The case-level verdict derived from a [`CriterionAggregate`]. Always
//! recomputed, never stored.
//!
//! ## Rules
//!
//! 1. Every member Approved gives [`CaseOutcome::Approved`].
//! 2. Otherwise any member Denied gives [`CaseOutcome::Denied`], with one
//!    [`DenialReason`] per denied member and the first day of the earliest
//!    denied assessment period.
//! 3. Otherwise [`CaseOutcome::Undetermined`], listing the members still
//!    undetermined.
//!
//! A case is never partially approved: Denied dominates Undetermined, and
//! Approved needs every member.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use vilkar_core::CriterionKind;
use vilkar_criteria::{Criterion, PensionCheck, Verdict};

use crate::aggregate::CriterionAggregate;
use crate::error::AggregateError;

/// Reason code handed to decision and letter generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DenialReason {
    #[serde(rename = "BOR_OG_OPPHOLDER_SEG_I_NORGE")]
    NotResidingInNorway,
    #[serde(rename = "FLYKTNING")]
    NotRefugee,
    #[serde(rename = "FORMUE")]
    AssetsAboveLimit,
    #[serde(rename = "INNLAGT_PÅ_INSTITUSJON")]
    InInstitution,
    #[serde(rename = "OPPHOLDSTILLATELSE")]
    NoResidencePermit,
    #[serde(rename = "MANGLENDE_DOKUMENTASJON")]
    MissingDocumentation,
    #[serde(rename = "PERSONLIG_OPPMØTE")]
    NoPersonalAttendance,
    #[serde(rename = "UFØRHET")]
    NotDisabled,
    #[serde(rename = "UTENLANDSOPPHOLD_OVER_90_DAGER")]
    AbroadOver90Days,
    #[serde(rename = "FAMILIEGJENFORENING")]
    FamilyReunification,
    /// Pension denied by caseworker verdict with no basis record.
    #[serde(rename = "PENSJON")]
    Pension,
    #[serde(rename = "MANGLER_VEDTAK_ALDERSPENSJON_FOLKETRYGDEN")]
    MissingNationalOldAgePension,
    #[serde(rename = "MANGLER_VEDTAK_ANDRE_NORSKE_PENSJONSORDNINGER")]
    MissingOtherNorwegianPension,
    #[serde(rename = "MANGLER_VEDTAK_UTENLANDSKE_PENSJONSORDNINGER")]
    MissingForeignPension,
}

impl DenialReason {
    /// The code as it appears on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotResidingInNorway => "BOR_OG_OPPHOLDER_SEG_I_NORGE",
            Self::NotRefugee => "FLYKTNING",
            Self::AssetsAboveLimit => "FORMUE",
            Self::InInstitution => "INNLAGT_PÅ_INSTITUSJON",
            Self::NoResidencePermit => "OPPHOLDSTILLATELSE",
            Self::MissingDocumentation => "MANGLENDE_DOKUMENTASJON",
            Self::NoPersonalAttendance => "PERSONLIG_OPPMØTE",
            Self::NotDisabled => "UFØRHET",
            Self::AbroadOver90Days => "UTENLANDSOPPHOLD_OVER_90_DAGER",
            Self::FamilyReunification => "FAMILIEGJENFORENING",
            Self::Pension => "PENSJON",
            Self::MissingNationalOldAgePension => "MANGLER_VEDTAK_ALDERSPENSJON_FOLKETRYGDEN",
            Self::MissingOtherNorwegianPension => "MANGLER_VEDTAK_ANDRE_NORSKE_PENSJONSORDNINGER",
            Self::MissingForeignPension => "MANGLER_VEDTAK_UTENLANDSKE_PENSJONSORDNINGER",
        }
    }

    /// Reason for a failed pension sub-check.
    pub fn for_pension_check(check: PensionCheck) -> Self {
        match check {
            PensionCheck::NationalOldAgePension => Self::MissingNationalOldAgePension,
            PensionCheck::OtherNorwegianSchemes => Self::MissingOtherNorwegianPension,
            PensionCheck::ForeignSchemes => Self::MissingForeignPension,
        }
    }
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Reasons contributed by one denied criterion.
pub fn denial_reasons(criterion: &Criterion) -> Vec<DenialReason> {
    let single = match criterion.kind() {
        CriterionKind::FixedResidenceInNorway => DenialReason::NotResidingInNorway,
        CriterionKind::RefugeeStatus => DenialReason::NotRefugee,
        CriterionKind::Assets => DenialReason::AssetsAboveLimit,
        CriterionKind::InstitutionalStay => DenialReason::InInstitution,
        CriterionKind::LawfulStay => DenialReason::NoResidencePermit,
        CriterionKind::DisclosureDuty => DenialReason::MissingDocumentation,
        CriterionKind::PersonalAttendance => DenialReason::NoPersonalAttendance,
        CriterionKind::Disability => DenialReason::NotDisabled,
        CriterionKind::ForeignStay => DenialReason::AbroadOver90Days,
        CriterionKind::FamilyReunification => DenialReason::FamilyReunification,
        CriterionKind::Pension => {
            let checks = criterion.failed_pension_checks();
            if !checks.is_empty() {
                return checks
                    .into_iter()
                    .map(DenialReason::for_pension_check)
                    .collect();
            }
            DenialReason::Pension
        }
    };
    vec![single]
}

/// Case-level verdict with the criteria that decided it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Every criterion approved ("innvilget").
    Approved { criteria: Vec<Criterion> },
    /// At least one criterion denied ("avslag"). `criteria` holds the
    /// denied ones.
    Denied {
        criteria: Vec<Criterion>,
        reasons: Vec<DenialReason>,
        earliest_denial_date: NaiveDate,
    },
    /// Nothing denied, something undetermined ("uavklart"). `criteria`
    /// holds the undetermined ones.
    Undetermined { criteria: Vec<Criterion> },
}

impl CaseOutcome {
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Approved { .. } => Verdict::Approved,
            Self::Denied { .. } => Verdict::Denied,
            Self::Undetermined { .. } => Verdict::Undetermined,
        }
    }

    pub fn criteria(&self) -> &[Criterion] {
        match self {
            Self::Approved { criteria }
            | Self::Denied { criteria, .. }
            | Self::Undetermined { criteria } => criteria,
        }
    }

    /// Whether `kind` is what caused the denial.
    ///
    /// `true` if `kind` is denied. `false` if some other single criterion
    /// is denied, or the case is not denied at all.
    ///
    /// # Errors
    ///
    /// [`AggregateError::AmbiguousDenialCause`] when several criteria are
    /// denied and `kind` is not one of them.
    pub fn is_sole_denial_cause(&self, kind: CriterionKind) -> Result<bool, AggregateError> {
        let Self::Denied { criteria, .. } = self else {
            return Ok(false);
        };
        if criteria.iter().any(|c| c.kind() == kind) {
            return Ok(true);
        }
        if criteria.len() == 1 {
            return Ok(false);
        }
        Err(AggregateError::AmbiguousDenialCause {
            kind,
            denied: criteria.iter().map(Criterion::kind).collect(),
        })
    }
}

/// Derive the case outcome from an aggregate.
pub fn derive_verdict(aggregate: &CriterionAggregate) -> CaseOutcome {
    let members = aggregate.criteria();

    if members.iter().all(|c| c.verdict().is_approved()) {
        return CaseOutcome::Approved {
            criteria: members.to_vec(),
        };
    }

    let denied: Vec<Criterion> = members
        .iter()
        .filter(|c| c.verdict().is_denied())
        .cloned()
        .collect();
    let earliest = denied.iter().filter_map(Criterion::earliest_denial_date).min();
    if let Some(earliest_denial_date) = earliest {
        let reasons = denied.iter().flat_map(denial_reasons).collect();
        return CaseOutcome::Denied {
            criteria: denied,
            reasons,
            earliest_denial_date,
        };
    }

    CaseOutcome::Undetermined {
        criteria: members
            .iter()
            .filter(|c| c.verdict() == Verdict::Undetermined)
            .cloned()
            .collect(),
    }
}
