//! # Criterion Kind — Single Source of Truth
//!
//! Defines the closed set of eligibility criteria ("vilkår") the engine
//! knows about. Every dispatch table keyed on a criterion kind is an
//! exhaustive `match` over [`CriterionKind`], so adding a kind is a
//! compile error until every table has an entry for it.
//!
//! Tables that live here:
//!
//! - [`CriterionKind::belongs_to`]: which case tracks bundle the criterion.
//! - [`CriterionKind::allows_multi_period_reconciliation`]: whether a
//!   criterion with several assessment periods may be moved onto a new
//!   support period.
//!
//! The denial-reason table lives with the case outcome in `vilkar-aggregate`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// All eligibility criteria evaluated by the engine.
///
/// | # | Kind | Norwegian term |
/// |---|------|----------------|
/// |  1 | Disability | Uførhet |
/// |  2 | Assets | Formue |
/// |  3 | RefugeeStatus | Flyktning |
/// |  4 | LawfulStay | Lovlig opphold |
/// |  5 | InstitutionalStay | Institusjonsopphold |
/// |  6 | ForeignStay | Utenlandsopphold |
/// |  7 | PersonalAttendance | Personlig oppmøte |
/// |  8 | FixedResidenceInNorway | Fast opphold i Norge |
/// |  9 | DisclosureDuty | Opplysningsplikt |
/// | 10 | FamilyReunification | Familiegjenforening |
/// | 11 | Pension | Pensjon |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    /// Reduced work capacity of at least the statutory degree.
    Disability,
    /// Net assets within the wage-base-derived limit.
    Assets,
    /// Recognised refugee status.
    RefugeeStatus,
    /// Lawful residence permit.
    LawfulStay,
    /// Not admitted to an institution beyond the permitted stay.
    InstitutionalStay,
    /// Not abroad for longer than permitted.
    ForeignStay,
    /// Appeared in person when applying.
    PersonalAttendance,
    /// Resides and stays permanently in Norway.
    FixedResidenceInNorway,
    /// Supplied the documentation the agency requested.
    DisclosureDuty,
    /// Not in the country on a family-reunification permit.
    FamilyReunification,
    /// Has applied for the pensions the claimant is entitled to.
    Pension,
}

/// Total number of criterion kinds.
pub const CRITERION_KIND_COUNT: usize = 11;

/// The two benefit tracks a case can be processed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseTrack {
    /// Disability-based supplementary benefit.
    Disability,
    /// Age-based supplementary benefit.
    Age,
}

impl CaseTrack {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disability => "disability",
            Self::Age => "age",
        }
    }

    /// Criterion kinds bundled for this track, in canonical order.
    pub fn criteria(&self) -> Vec<CriterionKind> {
        CriterionKind::all()
            .iter()
            .copied()
            .filter(|kind| kind.belongs_to(*self))
            .collect()
    }
}

impl std::fmt::Display for CaseTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CriterionKind {
    /// All kinds in canonical order.
    pub fn all() -> &'static [CriterionKind] {
        &[
            Self::Disability,
            Self::Assets,
            Self::RefugeeStatus,
            Self::LawfulStay,
            Self::InstitutionalStay,
            Self::ForeignStay,
            Self::PersonalAttendance,
            Self::FixedResidenceInNorway,
            Self::DisclosureDuty,
            Self::FamilyReunification,
            Self::Pension,
        ]
    }

    /// Snake-case identifier, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disability => "disability",
            Self::Assets => "assets",
            Self::RefugeeStatus => "refugee_status",
            Self::LawfulStay => "lawful_stay",
            Self::InstitutionalStay => "institutional_stay",
            Self::ForeignStay => "foreign_stay",
            Self::PersonalAttendance => "personal_attendance",
            Self::FixedResidenceInNorway => "fixed_residence_in_norway",
            Self::DisclosureDuty => "disclosure_duty",
            Self::FamilyReunification => "family_reunification",
            Self::Pension => "pension",
        }
    }

    /// Aggregate membership table.
    pub fn belongs_to(&self, track: CaseTrack) -> bool {
        match self {
            Self::Disability | Self::RefugeeStatus => track == CaseTrack::Disability,
            Self::Pension | Self::FamilyReunification => track == CaseTrack::Age,
            Self::Assets
            | Self::LawfulStay
            | Self::InstitutionalStay
            | Self::ForeignStay
            | Self::PersonalAttendance
            | Self::FixedResidenceInNorway
            | Self::DisclosureDuty => true,
        }
    }

    /// Whether a criterion holding several assessment periods may be
    /// reconciled onto a new support period.
    ///
    /// Assets verdicts are recomputed from the basis against the rate
    /// table, which is only defined for a single basis record.
    pub fn allows_multi_period_reconciliation(&self) -> bool {
        match self {
            Self::Assets => false,
            Self::Disability
            | Self::RefugeeStatus
            | Self::LawfulStay
            | Self::InstitutionalStay
            | Self::ForeignStay
            | Self::PersonalAttendance
            | Self::FixedResidenceInNorway
            | Self::DisclosureDuty
            | Self::FamilyReunification
            | Self::Pension => true,
        }
    }
}

impl std::fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CriterionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::UnknownCriterionKind(s.to_string()))
    }
}
