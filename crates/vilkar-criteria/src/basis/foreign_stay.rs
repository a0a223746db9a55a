//! Foreign-stay ("utenlandsopphold") basis record.

use serde::{Deserialize, Serialize};
use vilkar_core::{Period, Timestamp};

use super::{BasisHeader, DerivesVerdict};
use crate::verdict::Verdict;

/// Caseworker's finding on time spent abroad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignStayStatus {
    /// Stays in Norway for the period.
    StaysInNorway,
    /// Abroad for more than 90 days in the period.
    AbroadMoreThan90Days,
    Unclarified,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignStayBasis {
    pub header: BasisHeader,
    pub status: ForeignStayStatus,
}

impl ForeignStayBasis {
    pub fn new(created_at: Timestamp, period: Period, status: ForeignStayStatus) -> Self {
        Self {
            header: BasisHeader::new(created_at, period),
            status,
        }
    }
}

impl_basis!(ForeignStayBasis, |a, b| a.status == b.status);

impl DerivesVerdict for ForeignStayBasis {
    fn derived_verdict(&self) -> Verdict {
        match self.status {
            ForeignStayStatus::StaysInNorway => Verdict::Approved,
            ForeignStayStatus::AbroadMoreThan90Days => Verdict::Denied,
            ForeignStayStatus::Unclarified => Verdict::Undetermined,
        }
    }
}
