//! # Asset Limits — Per-Month Formue Thresholds
//!
//! An [`AssetLimitTable`] maps every calendar month in an unbroken span to
//! the asset limit in force that month. The limit is the wage base scaled
//! by a fixed [`Factor`] (one half by default), rounded half-up to whole
//! kroner.
//!
//! ## Invariant
//!
//! A table is never empty and never has gaps. Looking up a month outside
//! the covered span is an error, never a default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vilkar_core::{Month, Period};

use crate::error::SatsError;
use crate::wage_base::WageBaseTable;

/// Rational scaling factor applied to the wage base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FactorRepr", into = "FactorRepr")]
pub struct Factor {
    numerator: u32,
    denominator: u32,
}

#[derive(Serialize, Deserialize)]
struct FactorRepr {
    numerator: u32,
    denominator: u32,
}

impl TryFrom<FactorRepr> for Factor {
    type Error = SatsError;

    fn try_from(repr: FactorRepr) -> Result<Self, Self::Error> {
        Factor::new(repr.numerator, repr.denominator)
    }
}

impl From<Factor> for FactorRepr {
    fn from(f: Factor) -> Self {
        FactorRepr {
            numerator: f.numerator,
            denominator: f.denominator,
        }
    }
}

impl Factor {
    /// One half of the wage base.
    pub const HALF: Factor = Factor {
        numerator: 1,
        denominator: 2,
    };

    pub fn new(numerator: u32, denominator: u32) -> Result<Self, SatsError> {
        if numerator == 0 || denominator == 0 {
            return Err(SatsError::InvalidFactor {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// `amount * factor`, rounded half-up to a whole krone.
    pub fn apply_rounded(&self, amount: u64) -> u64 {
        let num = u128::from(amount) * u128::from(self.numerator);
        let den = u128::from(self.denominator);
        let rounded = (2 * num + den) / (2 * den);
        u64::try_from(rounded).unwrap_or(u64::MAX)
    }
}

impl Default for Factor {
    fn default() -> Self {
        Self::HALF
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// The asset limit in force for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLimit {
    pub month: Month,
    /// Wage base the limit was derived from, when derived rather than given.
    pub wage_base: Option<u64>,
    /// Limit in whole kroner.
    pub limit: u64,
}

/// Gap-free mapping from month to asset limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLimitTable {
    limits: BTreeMap<Month, AssetLimit>,
    covered: Period,
}

impl AssetLimitTable {
    /// Derive limits for every month of `period` from a wage-base history.
    ///
    /// # Errors
    ///
    /// [`SatsError::MonthNotCovered`] if some month of `period` precedes
    /// the earliest wage-base revision.
    pub fn from_wage_base(
        table: &WageBaseTable,
        factor: Factor,
        period: Period,
    ) -> Result<Self, SatsError> {
        let limits = period
            .months()
            .into_iter()
            .map(|month| {
                let base = table
                    .for_month(month)
                    .ok_or(SatsError::MonthNotCovered { month })?;
                Ok((
                    month,
                    AssetLimit {
                        month,
                        wage_base: Some(base.amount),
                        limit: factor.apply_rounded(base.amount),
                    },
                ))
            })
            .collect::<Result<BTreeMap<_, _>, SatsError>>()?;
        Ok(Self {
            limits,
            covered: period,
        })
    }

    /// Build a table from explicit per-month limits.
    ///
    /// # Errors
    ///
    /// Fails if the input is empty, names a month twice, or skips a month.
    pub fn from_monthly_limits(
        limits: impl IntoIterator<Item = (Month, u64)>,
    ) -> Result<Self, SatsError> {
        let mut map = BTreeMap::new();
        for (month, limit) in limits {
            let entry = AssetLimit {
                month,
                wage_base: None,
                limit,
            };
            if map.insert(month, entry).is_some() {
                return Err(SatsError::DuplicateEntry { month });
            }
        }
        let months: Vec<Month> = map.keys().copied().collect();
        if let Some(w) = months.windows(2).find(|w| w[0].succ() != Some(w[1])) {
            return Err(SatsError::Gap {
                after: w[0],
                next: w[1],
            });
        }
        let (first, last) = match (months.first(), months.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(SatsError::EmptyTable),
        };
        Ok(Self {
            limits: map,
            covered: Period::from_months(first, last)?,
        })
    }

    /// The same limit in every month of `period`.
    pub fn flat(period: Period, limit: u64) -> Self {
        let limits = period
            .months()
            .into_iter()
            .map(|month| {
                (
                    month,
                    AssetLimit {
                        month,
                        wage_base: None,
                        limit,
                    },
                )
            })
            .collect();
        Self {
            limits,
            covered: period,
        }
    }

    /// Limit in whole kroner for `month`.
    pub fn limit_for(&self, month: Month) -> Result<u64, SatsError> {
        self.limits
            .get(&month)
            .map(|l| l.limit)
            .ok_or(SatsError::MonthNotCovered { month })
    }

    /// The span of months the table has limits for.
    pub fn covered_period(&self) -> Period {
        self.covered
    }

    pub fn covers(&self, period: &Period) -> bool {
        self.covered.contains(period)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetLimit> {
        self.limits.values()
    }
}

/// Anything that can produce asset limits for a requested period.
pub trait AssetLimitSource {
    fn asset_limits(&self, period: Period) -> Result<AssetLimitTable, SatsError>;
}

impl AssetLimitSource for AssetLimitTable {
    fn asset_limits(&self, period: Period) -> Result<AssetLimitTable, SatsError> {
        if let Some(month) = period.months().into_iter().find(|m| !self.covered.contains_month(*m)) {
            return Err(SatsError::MonthNotCovered { month });
        }
        let limits = self
            .limits
            .range(period.first_month()..=period.last_month())
            .map(|(m, l)| (*m, *l))
            .collect();
        Ok(Self {
            limits,
            covered: period,
        })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_factor() -> impl Strategy<Value = Factor> {
        (1u32..10, 1u32..10).prop_map(|(n, d)| Factor::new(n, d).unwrap())
    }

    proptest! {
        #[test]
        fn apply_rounded_is_monotonic(f in arb_factor(), a in 0u64..10_000_000, b in 0u64..10_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(f.apply_rounded(lo) <= f.apply_rounded(hi));
        }

        #[test]
        fn apply_rounded_is_nearest_with_halves_up(f in arb_factor(), amount in 0u64..10_000_000) {
            let r = u128::from(f.apply_rounded(amount));
            let twice_exact = 2 * u128::from(amount) * u128::from(f.numerator());
            let d = u128::from(f.denominator());
            // r * d lies in (exact - d/2, exact + d/2]
            prop_assert!(2 * d * r <= twice_exact + d);
            prop_assert!(twice_exact + d < 2 * d * (r + 1));
        }

        #[test]
        fn half_matches_integer_formula(amount in 0u64..10_000_000) {
            prop_assert_eq!(Factor::HALF.apply_rounded(amount), (amount + 1) / 2);
        }

        #[test]
        fn flat_table_covers_every_month(first in 0i32..48, len in 1i32..36, limit in 0u64..1_000_000) {
            let start = Month::new(2019, 1).unwrap().plus(first).unwrap();
            let period = Period::from_months(start, start.plus(len - 1).unwrap()).unwrap();
            let table = AssetLimitTable::flat(period, limit);
            prop_assert_eq!(table.covered_period(), period);
            for month in period.months() {
                prop_assert_eq!(table.limit_for(month).unwrap(), limit);
            }
        }
    }
}
