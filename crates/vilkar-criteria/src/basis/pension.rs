//! Pension ("pensjon") basis record.
//!
//! Age-track claimants must have applied for every pension they may be
//! entitled to. Three schemes are checked independently, and each failed
//! check becomes its own denial sub-reason at case level.

use serde::{Deserialize, Serialize};
use vilkar_core::{Period, Timestamp};

use super::{BasisHeader, DerivesVerdict};
use crate::verdict::Verdict;

/// The pension schemes a claimant must have applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PensionCheck {
    /// Old-age pension from the national insurance scheme.
    NationalOldAgePension,
    /// Other Norwegian pension schemes.
    OtherNorwegianSchemes,
    /// Foreign pension schemes.
    ForeignSchemes,
}

impl PensionCheck {
    pub fn all() -> &'static [PensionCheck] {
        &[
            Self::NationalOldAgePension,
            Self::OtherNorwegianSchemes,
            Self::ForeignSchemes,
        ]
    }
}

/// Answer for one scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PensionClaim {
    Applied,
    NotApplied,
    /// The claimant has no entitlement under the scheme.
    NotRelevant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PensionBasis {
    pub header: BasisHeader,
    pub national_old_age_pension: PensionClaim,
    pub other_norwegian_schemes: PensionClaim,
    pub foreign_schemes: PensionClaim,
}

impl PensionBasis {
    pub fn new(
        created_at: Timestamp,
        period: Period,
        national_old_age_pension: PensionClaim,
        other_norwegian_schemes: PensionClaim,
        foreign_schemes: PensionClaim,
    ) -> Self {
        Self {
            header: BasisHeader::new(created_at, period),
            national_old_age_pension,
            other_norwegian_schemes,
            foreign_schemes,
        }
    }

    pub fn claim(&self, check: PensionCheck) -> PensionClaim {
        match check {
            PensionCheck::NationalOldAgePension => self.national_old_age_pension,
            PensionCheck::OtherNorwegianSchemes => self.other_norwegian_schemes,
            PensionCheck::ForeignSchemes => self.foreign_schemes,
        }
    }

    /// Checks the claimant has not applied for.
    pub fn failed_checks(&self) -> Vec<PensionCheck> {
        PensionCheck::all()
            .iter()
            .copied()
            .filter(|check| self.claim(*check) == PensionClaim::NotApplied)
            .collect()
    }
}

impl_basis!(PensionBasis, |a, b| a.national_old_age_pension
    == b.national_old_age_pension
    && a.other_norwegian_schemes == b.other_norwegian_schemes
    && a.foreign_schemes == b.foreign_schemes);

impl DerivesVerdict for PensionBasis {
    fn derived_verdict(&self) -> Verdict {
        if self.failed_checks().is_empty() {
            Verdict::Approved
        } else {
            Verdict::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::fixtures::*;
    use PensionClaim::*;

    #[test]
    fn applied_or_not_relevant_everywhere_is_approved() {
        let basis = PensionBasis::new(ts(), year(2021), Applied, NotRelevant, Applied);
        assert_eq!(basis.derived_verdict(), Verdict::Approved);
        assert!(basis.failed_checks().is_empty());
    }

    #[test]
    fn each_unapplied_scheme_is_a_failed_check() {
        let basis = PensionBasis::new(ts(), year(2021), NotApplied, Applied, NotApplied);
        assert_eq!(basis.derived_verdict(), Verdict::Denied);
        assert_eq!(
            basis.failed_checks(),
            vec![PensionCheck::NationalOldAgePension, PensionCheck::ForeignSchemes]
        );
    }
}
