//! Disclosure-duty ("opplysningsplikt") basis record.

use serde::Serialize;
use vilkar_core::{Period, Timestamp};

use super::{BasisHeader, DerivesVerdict};
use crate::verdict::Verdict;

/// Whether the claimant supplied the requested documentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisclosureDutyBasis {
    pub header: BasisHeader,
    pub documentation_sufficient: bool,
}

impl DisclosureDutyBasis {
    pub fn new(created_at: Timestamp, period: Period, documentation_sufficient: bool) -> Self {
        Self {
            header: BasisHeader::new(created_at, period),
            documentation_sufficient,
        }
    }
}

impl_basis!(DisclosureDutyBasis, |a, b| a.documentation_sufficient
    == b.documentation_sufficient);

impl DerivesVerdict for DisclosureDutyBasis {
    fn derived_verdict(&self) -> Verdict {
        if self.documentation_sufficient {
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

    #[test]
    fn sufficiency_decides_verdict() {
        assert_eq!(
            DisclosureDutyBasis::new(ts(), year(2021), true).derived_verdict(),
            Verdict::Approved
        );
        assert_eq!(
            DisclosureDutyBasis::new(ts(), year(2021), false).derived_verdict(),
            Verdict::Denied
        );
    }
}
