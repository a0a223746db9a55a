//! # vilkar-aggregate — Case-Level Composition
//!
//! Bundles the criteria of one case into a [`CriterionAggregate`], keeps
//! the shared-partition invariant, and derives the [`CaseOutcome`] that
//! decision and letter generation consume.
//!
//! ## Modules
//!
//! - [`aggregate`]: the criterion bundle and its invariant.
//! - [`outcome`]: case-level verdict and denial reasons.
//! - [`snapshot`]: delete-and-reinsert batches for persistence.
//! - [`error`]: fatal invariant violations and caller-facing errors.

pub mod aggregate;
pub mod error;
pub mod outcome;
pub mod snapshot;

pub use aggregate::{check_partitions, CriterionAggregate, ProcessingStep};
pub use error::AggregateError;
pub use outcome::{denial_reasons, derive_verdict, CaseOutcome, DenialReason};
pub use snapshot::{CriterionSnapshot, ReplacementBatch};
