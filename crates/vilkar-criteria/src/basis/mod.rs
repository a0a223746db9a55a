//! # Basis Records ("grunnlag")
//!
//! A basis record holds the facts a verdict was computed or justified
//! from, bound to exactly one [`Period`]. Records are never mutated: when
//! the period they cover changes, a new record with a fresh id supersedes
//! the old one for that sub-period ([`Basis::with_period`]).
//!
//! Each criterion kind that carries facts has its own record type.
//! Criterion kinds without facts use [`NoBasis`], which has no values, so
//! an assessment period for such a criterion can never carry a record.
//!
//! Two records are *equivalent* when their facts agree. Ids, creation
//! times and periods do not take part in equivalence.

use std::fmt;

use serde::Serialize;
use vilkar_core::{BasisId, Period, Timestamp};

use crate::verdict::Verdict;

/// Identity and period shared by every basis record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BasisHeader {
    pub id: BasisId,
    pub created_at: Timestamp,
    pub period: Period,
}

impl BasisHeader {
    /// Header for a freshly submitted record.
    pub fn new(created_at: Timestamp, period: Period) -> Self {
        Self {
            id: BasisId::new(),
            created_at,
            period,
        }
    }

    /// Header for a record superseding this one over `period`.
    pub fn superseded(&self, period: Period) -> Self {
        Self {
            id: BasisId::new(),
            created_at: self.created_at,
            period,
        }
    }
}

/// Behavior shared by all basis record types.
pub trait Basis: Clone + fmt::Debug + PartialEq + Serialize {
    fn header(&self) -> &BasisHeader;

    /// Same facts under a different header.
    fn with_header(&self, header: BasisHeader) -> Self;

    /// `true` if the criterion-specific facts agree.
    fn same_facts(&self, other: &Self) -> bool;

    fn id(&self) -> BasisId {
        self.header().id
    }

    fn created_at(&self) -> Timestamp {
        self.header().created_at
    }

    fn period(&self) -> Period {
        self.header().period
    }

    /// A new record with the same facts covering `period`.
    fn with_period(&self, period: Period) -> Self {
        self.with_header(self.header().superseded(period))
    }

    /// A new record with the same facts and period but a fresh id.
    fn with_new_id(&self) -> Self {
        self.with_period(self.period())
    }
}

/// Basis records whose facts alone decide the verdict.
pub trait DerivesVerdict: Basis {
    fn derived_verdict(&self) -> Verdict;
}

/// Basis type for criteria that record no facts.
///
/// Uninhabited: `Option<NoBasis>` is always `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NoBasis {}

impl Basis for NoBasis {
    fn header(&self) -> &BasisHeader {
        match *self {}
    }

    fn with_header(&self, _header: BasisHeader) -> Self {
        match *self {}
    }

    fn same_facts(&self, _other: &Self) -> bool {
        match *self {}
    }
}

/// Implements [`Basis`] for a struct with a `header: BasisHeader` field
/// and a `facts` comparison over the remaining fields.
///
/// Reached by textual scope, so the record modules must be declared below.
macro_rules! impl_basis {
    ($ty:ty, |$a:ident, $b:ident| $same:expr) => {
        impl $crate::basis::Basis for $ty {
            fn header(&self) -> &$crate::basis::BasisHeader {
                &self.header
            }

            fn with_header(&self, header: $crate::basis::BasisHeader) -> Self {
                Self {
                    header,
                    ..self.clone()
                }
            }

            fn same_facts(&self, other: &Self) -> bool {
                let $a = self;
                let $b = other;
                $same
            }
        }
    };
}

pub mod assets;
pub mod disability;
pub mod disclosure_duty;
pub mod foreign_stay;
pub mod pension;
pub mod personal_attendance;

pub use assets::{AssetValues, AssetsBasis};
pub use disability::DisabilityBasis;
pub use disclosure_duty::DisclosureDutyBasis;
pub use foreign_stay::{ForeignStayBasis, ForeignStayStatus};
pub use pension::{PensionBasis, PensionCheck, PensionClaim};
pub use personal_attendance::{AttendanceReason, PersonalAttendanceBasis};

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};
    use vilkar_core::{Month, Period, Timestamp};

    pub fn ts() -> Timestamp {
        Timestamp::from_utc(Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap())
    }

    pub fn months(y1: i32, m1: u32, y2: i32, m2: u32) -> Period {
        Period::from_months(Month::new(y1, m1).unwrap(), Month::new(y2, m2).unwrap()).unwrap()
    }

    pub fn year(y: i32) -> Period {
        Period::calendar_year(y).unwrap()
    }
}
