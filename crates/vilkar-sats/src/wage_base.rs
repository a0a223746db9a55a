//! # Wage Base — Grunnbeløp History
//!
//! The national insurance base amount ("grunnbeløp", G) is revised once a
//! year, normally with effect from 1 May. Asset limits are derived from it,
//! so the limit in force for a month is whatever G was in force that month.

use serde::{Deserialize, Serialize};
use vilkar_core::Month;

use crate::error::SatsError;

/// One revision of the wage base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageBase {
    /// First month the amount applies to.
    pub effective_from: Month,
    /// Yearly amount in whole kroner.
    pub amount: u64,
}

/// Wage-base revisions sorted by effective month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WageBaseTable {
    entries: Vec<WageBase>,
}

/// Published G amounts, each effective from 1 May.
const PUBLISHED: &[(i32, u64)] = &[
    (2015, 90_068),
    (2016, 92_576),
    (2017, 93_634),
    (2018, 96_883),
    (2019, 99_858),
    (2020, 101_351),
    (2021, 106_399),
    (2022, 111_477),
    (2023, 118_620),
    (2024, 124_028),
    (2025, 130_160),
];

impl WageBaseTable {
    /// Build a table from revisions in any order.
    ///
    /// # Errors
    ///
    /// Fails on an empty list or two revisions in the same month.
    pub fn new(mut entries: Vec<WageBase>) -> Result<Self, SatsError> {
        if entries.is_empty() {
            return Err(SatsError::EmptyTable);
        }
        entries.sort_by_key(|e| e.effective_from);
        if let Some(dup) = entries
            .windows(2)
            .find(|w| w[0].effective_from == w[1].effective_from)
        {
            return Err(SatsError::DuplicateEntry {
                month: dup[0].effective_from,
            });
        }
        Ok(Self { entries })
    }

    /// The published wage-base history shipped with the engine.
    pub fn builtin() -> Result<Self, SatsError> {
        let entries = PUBLISHED
            .iter()
            .map(|&(year, amount)| {
                Ok(WageBase {
                    effective_from: Month::new(year, 5)?,
                    amount,
                })
            })
            .collect::<Result<Vec<_>, SatsError>>()?;
        Self::new(entries)
    }

    /// The revision in force during `month`.
    pub fn for_month(&self, month: Month) -> Option<&WageBase> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.effective_from <= month)
    }

    pub fn entries(&self) -> &[WageBase] {
        &self.entries
    }

    /// First month any revision applies to.
    pub fn earliest(&self) -> Option<Month> {
        self.entries.first().map(|e| e.effective_from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(y: i32, mo: u32) -> Month {
        Month::new(y, mo).unwrap()
    }

    #[test]
    fn builtin_is_sorted_and_starts_2015() {
        let table = WageBaseTable::builtin().unwrap();
        assert_eq!(table.earliest(), Some(m(2015, 5)));
        assert!(table
            .entries()
            .windows(2)
            .all(|w| w[0].effective_from < w[1].effective_from));
    }

    #[test]
    fn revision_takes_effect_in_may() {
        let table = WageBaseTable::builtin().unwrap();
        assert_eq!(table.for_month(m(2021, 4)).unwrap().amount, 101_351);
        assert_eq!(table.for_month(m(2021, 5)).unwrap().amount, 106_399);
        assert_eq!(table.for_month(m(2022, 4)).unwrap().amount, 106_399);
    }

    #[test]
    fn month_before_history_is_none() {
        let table = WageBaseTable::builtin().unwrap();
        assert!(table.for_month(m(2015, 4)).is_none());
    }

    #[test]
    fn new_sorts_and_rejects_duplicates() {
        let table = WageBaseTable::new(vec![
            WageBase { effective_from: m(2022, 5), amount: 2 },
            WageBase { effective_from: m(2021, 5), amount: 1 },
        ])
        .unwrap();
        assert_eq!(table.entries()[0].amount, 1);

        let dup = WageBaseTable::new(vec![
            WageBase { effective_from: m(2021, 5), amount: 1 },
            WageBase { effective_from: m(2021, 5), amount: 2 },
        ]);
        assert!(matches!(dup, Err(SatsError::DuplicateEntry { .. })));
        assert!(matches!(WageBaseTable::new(vec![]), Err(SatsError::EmptyTable)));
    }
}
