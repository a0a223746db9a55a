//! Disability ("uførhet") basis record.

use serde::Serialize;
use vilkar_core::{CriterionKind, Period, Timestamp};

use super::BasisHeader;
use crate::error::CriterionError;

/// Disability degree and the income the claimant is expected to earn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisabilityBasis {
    pub header: BasisHeader,
    /// Reduction in earning capacity, 1 to 100 percent.
    pub degree: u8,
    /// Expected yearly income in whole kroner ("forventet inntekt").
    pub expected_income: u64,
}

impl DisabilityBasis {
    pub fn new(
        created_at: Timestamp,
        period: Period,
        degree: u8,
        expected_income: u64,
    ) -> Result<Self, CriterionError> {
        if !(1..=100).contains(&degree) {
            return Err(CriterionError::InvalidBasis {
                kind: CriterionKind::Disability,
                reason: format!("disability degree must be between 1 and 100, got {degree}"),
            });
        }
        Ok(Self {
            header: BasisHeader::new(created_at, period),
            degree,
            expected_income,
        })
    }
}

impl_basis!(DisabilityBasis, |a, b| a.degree == b.degree
    && a.expected_income == b.expected_income);
