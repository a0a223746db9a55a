//! Personal-attendance ("personlig oppmøte") basis record.

use serde::{Deserialize, Serialize};
use vilkar_core::{Period, Timestamp};

use super::{BasisHeader, DerivesVerdict};
use crate::verdict::Verdict;

/// How the attendance requirement was met, or why it was not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceReason {
    AttendedInPerson,
    /// A guardian attended on the claimant's behalf.
    RepresentedByGuardian,
    /// Ill, with a medical certificate and power of attorney.
    IllWithCertificateAndPowerOfAttorney,
    /// Briefly ill, with a medical certificate.
    BrieflyIllWithCertificate,
    /// Temporarily exempt from the attendance requirement.
    TemporarilyExempt,
    DidNotAttend,
    Unclarified,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalAttendanceBasis {
    pub header: BasisHeader,
    pub reason: AttendanceReason,
}

impl PersonalAttendanceBasis {
    pub fn new(created_at: Timestamp, period: Period, reason: AttendanceReason) -> Self {
        Self {
            header: BasisHeader::new(created_at, period),
            reason,
        }
    }
}

impl_basis!(PersonalAttendanceBasis, |a, b| a.reason == b.reason);

impl DerivesVerdict for PersonalAttendanceBasis {
    fn derived_verdict(&self) -> Verdict {
        match self.reason {
            AttendanceReason::AttendedInPerson
            | AttendanceReason::RepresentedByGuardian
            | AttendanceReason::IllWithCertificateAndPowerOfAttorney
            | AttendanceReason::BrieflyIllWithCertificate
            | AttendanceReason::TemporarilyExempt => Verdict::Approved,
            AttendanceReason::DidNotAttend => Verdict::Denied,
            AttendanceReason::Unclarified => Verdict::Undetermined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::fixtures::*;

    #[test]
    fn excused_absence_is_approved() {
        let basis = PersonalAttendanceBasis::new(
            ts(),
            year(2021),
            AttendanceReason::BrieflyIllWithCertificate,
        );
        assert_eq!(basis.derived_verdict(), Verdict::Approved);
    }

    #[test]
    fn absence_is_denied_and_unclarified_is_undetermined() {
        let absent = PersonalAttendanceBasis::new(ts(), year(2021), AttendanceReason::DidNotAttend);
        let unclear = PersonalAttendanceBasis::new(ts(), year(2021), AttendanceReason::Unclarified);
        assert_eq!(absent.derived_verdict(), Verdict::Denied);
        assert_eq!(unclear.derived_verdict(), Verdict::Undetermined);
    }
}
