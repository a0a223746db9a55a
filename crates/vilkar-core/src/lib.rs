//! # vilkar-core — Foundational Types for the Vilkår Engine
//!
//! Leaf crate of the workspace. Defines the value types every other crate
//! builds on: month-aligned [`Period`]s and their arithmetic, the closed
//! [`CriterionKind`] enumeration, typed identifiers, and UTC timestamps.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vilkar-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Malformed values are rejected at construction, never at use.

pub mod criterion_kind;
pub mod error;
pub mod identity;
pub mod period;
pub mod temporal;

pub use criterion_kind::{CaseTrack, CriterionKind, CRITERION_KIND_COUNT};
pub use error::{CoreError, PeriodError};
pub use identity::{AssessmentId, BasisId, CaseId};
pub use period::{
    complement, has_duplicates, has_overlapping, is_contiguous, is_sorted, min_and_max_of,
    minimal_covering_partition, Month, Period,
};
pub use temporal::Timestamp;
