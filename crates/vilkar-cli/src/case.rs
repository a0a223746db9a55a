//! # Case Files
//!
//! JSON input for `vilkar evaluate`. The file is deserialized into plain
//! DTOs first and every value then goes through the engine constructors,
//! so a malformed case is rejected with the same errors a caller of the
//! library would see.
//!
//! ```json
//! {
//!   "step": "application",
//!   "track": "disability",
//!   "created_at": "2021-01-01T12:00:00Z",
//!   "criteria": [
//!     { "kind": "lawful_stay",
//!       "periods": [{ "period": "2021-01..2021-12", "verdict": "approved" }] },
//!     { "kind": "assets",
//!       "periods": [{ "period": "2021-01..2021-12",
//!                     "basis": { "type": "assets", "applicant": { "cash": 40000 } } }] }
//!   ]
//! }
//! ```
//!
//! A criterion with an empty `periods` list is unassessed.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use vilkar_aggregate::{CriterionAggregate, ProcessingStep};
use vilkar_core::{min_and_max_of, CaseId, CaseTrack, CriterionKind, Period, Timestamp};
use vilkar_criteria::{
    assets, AssessmentPeriod, Assessment, AssetValues, AssetsBasis, AttendanceReason, Basis,
    Criterion, DerivesVerdict, DisabilityBasis, DisclosureDutyBasis, ForeignStayBasis,
    ForeignStayStatus, NoBasis, PensionBasis, PensionClaim, PersonalAttendanceBasis, Verdict,
};
use vilkar_sats::AssetLimitTable;

/// Top-level case file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseFile {
    #[serde(default)]
    pub case_id: Option<CaseId>,
    pub step: ProcessingStep,
    pub track: CaseTrack,
    /// Creation time stamped on every record; defaults to now.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    pub criteria: Vec<CriterionDto>,
}

/// One criterion and its assessment periods.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriterionDto {
    pub kind: CriterionKind,
    #[serde(default)]
    pub periods: Vec<PeriodDto>,
}

/// One assessment period. `period` is `"YYYY-MM..YYYY-MM"` or `"YYYY-MM"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeriodDto {
    pub period: String,
    #[serde(default)]
    pub verdict: Option<Verdict>,
    #[serde(default)]
    pub basis: Option<BasisDto>,
}

/// Basis record facts, tagged by criterion.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum BasisDto {
    Assets {
        #[serde(default)]
        applicant: AssetValues,
        #[serde(default)]
        spouse: Option<AssetValues>,
        #[serde(default)]
        needs_more_information: bool,
    },
    Disability {
        degree: u8,
        #[serde(default)]
        expected_income: u64,
    },
    ForeignStay {
        status: ForeignStayStatus,
    },
    PersonalAttendance {
        reason: AttendanceReason,
    },
    DisclosureDuty {
        documentation_sufficient: bool,
    },
    Pension {
        national_old_age_pension: PensionClaim,
        other_norwegian_schemes: PensionClaim,
        foreign_schemes: PensionClaim,
    },
}

impl BasisDto {
    pub fn kind(&self) -> CriterionKind {
        match self {
            Self::Assets { .. } => CriterionKind::Assets,
            Self::Disability { .. } => CriterionKind::Disability,
            Self::ForeignStay { .. } => CriterionKind::ForeignStay,
            Self::PersonalAttendance { .. } => CriterionKind::PersonalAttendance,
            Self::DisclosureDuty { .. } => CriterionKind::DisclosureDuty,
            Self::Pension { .. } => CriterionKind::Pension,
        }
    }
}

impl CaseFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read case file: {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("invalid case file: {}", path.display()))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse case JSON")
    }

    /// Span the asset-limit table must cover: every assets period plus
    /// the reconciliation target, if any.
    pub fn asset_limit_span(&self, target: Option<Period>) -> Result<Option<Period>> {
        let mut periods: Vec<Period> = target.into_iter().collect();
        for criterion in self.criteria.iter().filter(|c| c.kind == CriterionKind::Assets) {
            for p in &criterion.periods {
                periods.push(parse_period(&p.period)?);
            }
        }
        Ok(min_and_max_of(&periods))
    }

    /// Validate every criterion and assemble the aggregate.
    ///
    /// `limits` must cover every assets period that carries a basis.
    pub fn to_aggregate(&self, limits: Option<&AssetLimitTable>) -> Result<CriterionAggregate> {
        let created_at = self.created_at.unwrap_or_else(Timestamp::now);
        let criteria = self
            .criteria
            .iter()
            .map(|c| {
                c.to_criterion(created_at, limits)
                    .with_context(|| format!("invalid {} criterion", c.kind))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(CriterionAggregate::try_new(self.step, self.track, criteria)?)
    }

    pub fn case_id(&self) -> CaseId {
        self.case_id.unwrap_or_default()
    }
}

impl CriterionDto {
    pub fn to_criterion(
        &self,
        created_at: Timestamp,
        limits: Option<&AssetLimitTable>,
    ) -> Result<Criterion> {
        if let Some(other) = self
            .periods
            .iter()
            .filter_map(|p| p.basis.as_ref())
            .find(|b| b.kind() != self.kind)
        {
            bail!("{} basis given for a {} criterion", other.kind(), self.kind);
        }
        if self.periods.is_empty() {
            return Ok(Criterion::unassessed(self.kind));
        }

        let criterion = match self.kind {
            CriterionKind::Assets => {
                Criterion::Assets(self.build(|period, dto| assets_period(created_at, period, dto, limits))?)
            }
            CriterionKind::Disability => Criterion::Disability(self.build(|period, dto| {
                let basis = match &dto.basis {
                    Some(BasisDto::Disability {
                        degree,
                        expected_income,
                    }) => Some(DisabilityBasis::new(created_at, period, *degree, *expected_income)?),
                    _ => None,
                };
                caseworker(created_at, period, dto, basis)
            })?),
            CriterionKind::ForeignStay => Criterion::ForeignStay(self.build(|period, dto| {
                let basis = match &dto.basis {
                    Some(BasisDto::ForeignStay { status }) => {
                        Some(ForeignStayBasis::new(created_at, period, *status))
                    }
                    _ => None,
                };
                derived(created_at, period, dto, basis)
            })?),
            CriterionKind::PersonalAttendance => Criterion::PersonalAttendance(self.build(|period, dto| {
                let basis = match &dto.basis {
                    Some(BasisDto::PersonalAttendance { reason }) => {
                        Some(PersonalAttendanceBasis::new(created_at, period, *reason))
                    }
                    _ => None,
                };
                derived(created_at, period, dto, basis)
            })?),
            CriterionKind::DisclosureDuty => Criterion::DisclosureDuty(self.build(|period, dto| {
                let basis = match &dto.basis {
                    Some(BasisDto::DisclosureDuty {
                        documentation_sufficient,
                    }) => Some(DisclosureDutyBasis::new(
                        created_at,
                        period,
                        *documentation_sufficient,
                    )),
                    _ => None,
                };
                derived(created_at, period, dto, basis)
            })?),
            CriterionKind::Pension => Criterion::Pension(self.build(|period, dto| {
                let basis = match &dto.basis {
                    Some(BasisDto::Pension {
                        national_old_age_pension,
                        other_norwegian_schemes,
                        foreign_schemes,
                    }) => Some(PensionBasis::new(
                        created_at,
                        period,
                        *national_old_age_pension,
                        *other_norwegian_schemes,
                        *foreign_schemes,
                    )),
                    _ => None,
                };
                derived(created_at, period, dto, basis)
            })?),
            CriterionKind::RefugeeStatus => Criterion::RefugeeStatus(self.build_plain(created_at)?),
            CriterionKind::LawfulStay => Criterion::LawfulStay(self.build_plain(created_at)?),
            CriterionKind::InstitutionalStay => {
                Criterion::InstitutionalStay(self.build_plain(created_at)?)
            }
            CriterionKind::FixedResidenceInNorway => {
                Criterion::FixedResidenceInNorway(self.build_plain(created_at)?)
            }
            CriterionKind::FamilyReunification => {
                Criterion::FamilyReunification(self.build_plain(created_at)?)
            }
        };
        Ok(criterion)
    }

    fn build<B: Basis>(
        &self,
        mut f: impl FnMut(Period, &PeriodDto) -> Result<AssessmentPeriod<B>>,
    ) -> Result<Assessment<B>> {
        let periods = self
            .periods
            .iter()
            .map(|dto| {
                let period = parse_period(&dto.period)?;
                f(period, dto).with_context(|| format!("period {}", dto.period))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Assessment::assessed(periods)?)
    }

    fn build_plain(&self, created_at: Timestamp) -> Result<Assessment<NoBasis>> {
        self.build(|period, dto| caseworker(created_at, period, dto, None))
    }
}

fn parse_period(text: &str) -> Result<Period> {
    text.parse::<Period>()
        .with_context(|| format!("invalid period {text:?}"))
}

/// Verdict set by the caseworker; the basis, if any, is informational.
fn caseworker<B: Basis>(
    created_at: Timestamp,
    period: Period,
    dto: &PeriodDto,
    basis: Option<B>,
) -> Result<AssessmentPeriod<B>> {
    let verdict = dto.verdict.context("a verdict is required")?;
    Ok(AssessmentPeriod::new(created_at, period, verdict, basis)?)
}

/// Verdict derived from the basis unless the caseworker set one.
fn derived<B: DerivesVerdict>(
    created_at: Timestamp,
    period: Period,
    dto: &PeriodDto,
    basis: Option<B>,
) -> Result<AssessmentPeriod<B>> {
    match (dto.verdict, basis) {
        (None, Some(basis)) => Ok(AssessmentPeriod::from_basis(created_at, basis)),
        (Some(verdict), basis) => Ok(AssessmentPeriod::new(created_at, period, verdict, basis)?),
        (None, None) => bail!("either a verdict or a basis is required"),
    }
}

/// Assets verdicts are always evaluated against the rate table when a
/// basis is present.
fn assets_period(
    created_at: Timestamp,
    period: Period,
    dto: &PeriodDto,
    limits: Option<&AssetLimitTable>,
) -> Result<AssessmentPeriod<AssetsBasis>> {
    let Some(BasisDto::Assets {
        applicant,
        spouse,
        needs_more_information,
    }) = &dto.basis
    else {
        return caseworker(created_at, period, dto, None);
    };
    if dto.verdict.is_some() {
        bail!("assets verdicts are computed from the basis and cannot be set");
    }
    let mut basis = AssetsBasis::new(created_at, period, *applicant, *spouse);
    if *needs_more_information {
        basis = basis.needing_more_information();
    }
    let limits = limits.context("no asset-limit table for assets basis")?;
    Ok(assets::assess(created_at, basis, limits)?)
}
