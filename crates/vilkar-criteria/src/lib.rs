//! # vilkar-criteria — Eligibility Criteria
//!
//! Every eligibility criterion ("vilkår") is a timeline of
//! [`AssessmentPeriod`]s, each carrying a [`Verdict`] and optionally the
//! basis record ("grunnlag") the verdict rests on.
//!
//! ## Modules
//!
//! - [`verdict`]: the three-valued verdict and its meet.
//! - [`basis`]: basis record types per criterion kind.
//! - [`assessment`]: assessment periods and the assessed/unassessed state.
//! - [`timeline`]: reconciliation onto a target period.
//! - [`merge`]: coalescing adjacent equivalent periods.
//! - [`assets`]: the threshold evaluator and spouse-asset masking.
//! - [`criterion`]: the closed [`Criterion`] union over all kinds.
//!
//! ## Crate Policy
//!
//! - Values are immutable. Every operation returns a new value.
//! - Overlapping periods and basis/period mismatches are rejected at
//!   construction.

pub mod assessment;
pub mod assets;
pub mod basis;
pub mod criterion;
pub mod error;
pub mod merge;
pub mod timeline;
pub mod verdict;

pub use assessment::{AssessedPeriods, Assessment, AssessmentPeriod};
pub use basis::{
    AssetValues, AssetsBasis, AttendanceReason, Basis, BasisHeader, DerivesVerdict,
    DisabilityBasis, DisclosureDutyBasis, ForeignStayBasis, ForeignStayStatus, NoBasis,
    PensionBasis, PensionCheck, PensionClaim, PersonalAttendanceBasis,
};
pub use criterion::Criterion;
pub use error::CriterionError;
pub use timeline::{GapFillStrategy, StretchNearestNeighbour};
pub use verdict::Verdict;
