//! # Error Types — Core Construction Failures
//!
//! Every failure in this crate happens at construction time. Once a
//! [`Period`](crate::Period) or [`Month`](crate::Month) exists it is
//! well-formed, and the arithmetic on it is total.

use chrono::NaiveDate;
use thiserror::Error;

/// Rejected period or month construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// The start date is not the first day of its month.
    #[error("period must start on the first day of a month, got {0}")]
    FromNotFirstDayOfMonth(NaiveDate),

    /// The end date is not the last day of its month.
    #[error("period must end on the last day of a month, got {0}")]
    ToNotLastDayOfMonth(NaiveDate),

    /// The start date lies after the end date.
    #[error("period start {from} is after period end {to}")]
    FromAfterTo { from: NaiveDate, to: NaiveDate },

    /// Year/month pair outside the representable calendar.
    #[error("invalid calendar month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    /// A textual period or month could not be parsed.
    #[error("cannot parse {input:?}: {reason}")]
    Parse { input: String, reason: String },
}

/// Top-level error type for `vilkar-core`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed period or month.
    #[error("period error: {0}")]
    Period(#[from] PeriodError),

    /// Timestamp outside UTC or unparseable.
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// Unknown criterion kind identifier.
    #[error("unknown criterion kind: {0:?}")]
    UnknownCriterionKind(String),
}
