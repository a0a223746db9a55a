//! Assets ("formue") basis record.
//!
//! Amounts are whole kroner. The rent-deposit account is part of the
//! applicant's bank deposits but exempt from the limit, so it is deducted
//! from deposits (never below zero) when summing.

use serde::{Deserialize, Serialize};
use vilkar_core::{Period, Timestamp};

use super::BasisHeader;

/// Asset components for one person. Missing components read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetValues {
    /// Real estate that is not the primary residence.
    pub non_primary_residence: u64,
    /// Other real estate.
    pub real_estate: u64,
    pub vehicles: u64,
    pub bank_deposits: u64,
    pub securities: u64,
    /// Money others owe the person.
    pub money_owed: u64,
    pub cash: u64,
    /// Rent-deposit account, deducted from `bank_deposits`.
    pub rent_deposit_account: u64,
}

impl AssetValues {
    /// Countable assets.
    pub fn sum(&self) -> u64 {
        let deposits = self.bank_deposits.saturating_sub(self.rent_deposit_account);
        [
            self.non_primary_residence,
            self.real_estate,
            self.vehicles,
            deposits,
            self.securities,
            self.money_owed,
            self.cash,
        ]
        .into_iter()
        .fold(0u64, u64::saturating_add)
    }
}

/// Assets basis: applicant components plus optional spouse components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetsBasis {
    pub header: BasisHeader,
    pub applicant: AssetValues,
    /// Components for a spouse or cohabitant ("EPS"), when one exists.
    pub spouse: Option<AssetValues>,
    /// Caseworker flag: the figures are incomplete and the verdict is
    /// Undetermined until more information arrives.
    pub needs_more_information: bool,
}

impl AssetsBasis {
    pub fn new(
        created_at: Timestamp,
        period: Period,
        applicant: AssetValues,
        spouse: Option<AssetValues>,
    ) -> Self {
        Self {
            header: BasisHeader::new(created_at, period),
            applicant,
            spouse,
            needs_more_information: false,
        }
    }

    /// Mark the figures as incomplete.
    pub fn needing_more_information(self) -> Self {
        Self {
            needs_more_information: true,
            ..self
        }
    }

    /// Sum of applicant and spouse components.
    pub fn total(&self) -> u64 {
        self.applicant
            .sum()
            .saturating_add(self.spouse.map(|s| s.sum()).unwrap_or(0))
    }

    /// Same record without spouse components (new id).
    pub fn without_spouse(&self) -> Self {
        Self {
            header: self.header.superseded(self.header.period),
            spouse: None,
            ..self.clone()
        }
    }

    /// Same record with zeroed spouse components if none were given.
    ///
    /// Returns an unchanged clone when spouse components already exist.
    pub fn with_empty_spouse_if_missing(&self) -> Self {
        if self.spouse.is_some() {
            return self.clone();
        }
        Self {
            header: self.header.superseded(self.header.period),
            spouse: Some(AssetValues::default()),
            ..self.clone()
        }
    }
}

impl_basis!(AssetsBasis, |a, b| a.applicant == b.applicant
    && a.spouse == b.spouse
    && a.needs_more_information == b.needs_more_information);
