//! # Period — Month-Aligned Date Intervals
//!
//! A [`Period`] is a closed interval of whole calendar months: it starts
//! on the first day of a month and ends on the last day of a month. All
//! eligibility verdicts in the engine are bound to periods, and all
//! re-partitioning of criteria is expressed with the arithmetic here.
//!
//! ## Invariant
//!
//! Malformed input (start after end, start not on the first of a month,
//! end not on the last of a month) fails at construction, including when
//! deserializing. Every operation on a constructed `Period` is total.
//!
//! ## Ordering
//!
//! Periods order by start month, then by end month.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::PeriodError;

// ---------------------------------------------------------------------------
// Month
// ---------------------------------------------------------------------------

/// One calendar month.
///
/// Serializes as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    first: NaiveDate,
    last: NaiveDate,
}

impl Month {
    /// Create a month from a year and a 1-based month number.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        month_bounds(year, month)
            .map(|(first, last)| Self { first, last })
            .ok_or(PeriodError::InvalidMonth { year, month })
    }

    /// The month a date falls in.
    pub fn containing(date: NaiveDate) -> Result<Self, PeriodError> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    /// The following month, or `None` at the end of the calendar.
    pub fn succ(&self) -> Option<Self> {
        self.plus(1)
    }

    /// The preceding month, or `None` at the start of the calendar.
    pub fn pred(&self) -> Option<Self> {
        self.plus(-1)
    }

    /// Shift by `n` months in either direction.
    pub fn plus(&self, n: i32) -> Option<Self> {
        let shifted = if n >= 0 {
            self.first.checked_add_months(Months::new(n.unsigned_abs()))?
        } else {
            self.first.checked_sub_months(Months::new(n.unsigned_abs()))?
        };
        Self::containing(shifted).ok()
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: Month) -> i64 {
        other.ordinal() - self.ordinal()
    }

    /// This month as a single-month period.
    pub fn to_period(self) -> Period {
        Period {
            first: self,
            last: self,
        }
    }

    fn ordinal(&self) -> i64 {
        i64::from(self.year()) * 12 + i64::from(self.month()) - 1
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Month {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = |reason: &str| PeriodError::Parse {
            input: s.to_string(),
            reason: reason.to_string(),
        };
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| parse_err("expected YYYY-MM"))?;
        let year: i32 = year.parse().map_err(|_| parse_err("year is not a number"))?;
        let month: u32 = month.parse().map_err(|_| parse_err("month is not a number"))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for Month {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// A closed, month-aligned date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "PeriodRepr", into = "PeriodRepr")]
pub struct Period {
    first: Month,
    last: Month,
}

#[derive(Serialize, Deserialize)]
struct PeriodRepr {
    from_inclusive: NaiveDate,
    to_inclusive: NaiveDate,
}

impl TryFrom<PeriodRepr> for Period {
    type Error = PeriodError;

    fn try_from(repr: PeriodRepr) -> Result<Self, Self::Error> {
        Period::new(repr.from_inclusive, repr.to_inclusive)
    }
}

impl From<Period> for PeriodRepr {
    fn from(period: Period) -> Self {
        PeriodRepr {
            from_inclusive: period.from(),
            to_inclusive: period.to(),
        }
    }
}

impl Period {
    /// Create a period from explicit dates.
    ///
    /// # Errors
    ///
    /// Fails if `from` is not the first day of a month, `to` is not the
    /// last day of a month, or `from > to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, PeriodError> {
        let first = Month::containing(from)?;
        if first.first_day() != from {
            return Err(PeriodError::FromNotFirstDayOfMonth(from));
        }
        let last = Month::containing(to)?;
        if last.last_day() != to {
            return Err(PeriodError::ToNotLastDayOfMonth(to));
        }
        if from > to {
            return Err(PeriodError::FromAfterTo { from, to });
        }
        Ok(Self { first, last })
    }

    /// Period spanning `first` through `last`, both inclusive.
    pub fn from_months(first: Month, last: Month) -> Result<Self, PeriodError> {
        if first > last {
            return Err(PeriodError::FromAfterTo {
                from: first.first_day(),
                to: last.last_day(),
            });
        }
        Ok(Self { first, last })
    }

    /// January through December of `year`.
    pub fn calendar_year(year: i32) -> Result<Self, PeriodError> {
        Self::from_months(Month::new(year, 1)?, Month::new(year, 12)?)
    }

    /// First day of the period.
    pub fn from(&self) -> NaiveDate {
        self.first.first_day()
    }

    /// Last day of the period.
    pub fn to(&self) -> NaiveDate {
        self.last.last_day()
    }

    pub fn first_month(&self) -> Month {
        self.first
    }

    pub fn last_month(&self) -> Month {
        self.last
    }

    /// Number of calendar months covered (at least 1).
    pub fn month_count(&self) -> u32 {
        u32::try_from(self.first.months_until(self.last) + 1).unwrap_or(u32::MAX)
    }

    /// Every month in the period, ascending.
    pub fn months(&self) -> Vec<Month> {
        let mut months = Vec::new();
        let mut current = Some(self.first);
        while let Some(month) = current {
            if month > self.last {
                break;
            }
            months.push(month);
            current = month.succ();
        }
        months
    }

    pub fn contains_month(&self, month: Month) -> bool {
        self.first <= month && month <= self.last
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.from() <= date && date <= self.to()
    }

    /// `true` if `inner` lies entirely within `self`.
    pub fn contains(&self, inner: &Period) -> bool {
        self.first <= inner.first && inner.last <= self.last
    }

    /// `true` if the periods share at least one month.
    pub fn overlaps(&self, other: &Period) -> bool {
        self.first <= other.last && other.first <= self.last
    }

    /// `true` if the periods touch with no gap and do not overlap.
    pub fn is_adjacent_to(&self, other: &Period) -> bool {
        self.last.succ() == Some(other.first) || other.last.succ() == Some(self.first)
    }

    /// The months shared by both periods.
    pub fn intersection(&self, other: &Period) -> Option<Period> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Period {
            first: self.first.max(other.first),
            last: self.last.min(other.last),
        })
    }

    /// Union of two periods that overlap or touch.
    ///
    /// Returns `None` when there is a gap between them.
    pub fn merge(&self, other: &Period) -> Option<Period> {
        if !self.overlaps(other) && !self.is_adjacent_to(other) {
            return None;
        }
        Some(Period {
            first: self.first.min(other.first),
            last: self.last.max(other.last),
        })
    }

    pub fn starts_before(&self, other: &Period) -> bool {
        self.first < other.first
    }

    pub fn ends_before(&self, other: &Period) -> bool {
        self.last < other.last
    }

    /// Number of whole months strictly between two disjoint periods.
    ///
    /// Overlapping and adjacent periods are at distance zero.
    pub fn months_between(&self, other: &Period) -> u32 {
        if self.overlaps(other) {
            return 0;
        }
        let gap = if self.last < other.first {
            self.last.months_until(other.first) - 1
        } else {
            other.last.months_until(self.first) - 1
        };
        u32::try_from(gap.max(0)).unwrap_or(u32::MAX)
    }

    /// Shift the whole period by `months` (negative shifts backwards).
    pub fn shift(&self, months: i32) -> Result<Period, PeriodError> {
        let overflow = || PeriodError::InvalidMonth {
            year: self.first.year(),
            month: self.first.month(),
        };
        Ok(Period {
            first: self.first.plus(months).ok_or_else(overflow)?,
            last: self.last.plus(months).ok_or_else(overflow)?,
        })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from(), self.to())
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    /// Parses `"YYYY-MM..YYYY-MM"`, or a single `"YYYY-MM"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once("..") {
            Some((first, last)) => Period::from_months(first.parse()?, last.parse()?),
            None => Ok(s.parse::<Month>()?.to_period()),
        }
    }
}

// ---------------------------------------------------------------------------
// Operations over collections of periods
// ---------------------------------------------------------------------------

/// Smallest period enclosing every input period.
pub fn min_and_max_of(periods: &[Period]) -> Option<Period> {
    let first = periods.iter().map(|p| p.first).min()?;
    let last = periods.iter().map(|p| p.last).max()?;
    Some(Period { first, last })
}

/// Sub-periods of `universe` not covered by any period in `subtract`.
///
/// The result is sorted, disjoint, and uses the fewest periods possible.
pub fn complement(universe: &Period, subtract: &[Period]) -> Vec<Period> {
    let remaining = universe
        .months()
        .into_iter()
        .filter(|month| !subtract.iter().any(|p| p.contains_month(*month)));
    coalesce(remaining)
}

/// Collapse possibly-overlapping periods into the fewest disjoint
/// periods covering exactly the same months.
pub fn minimal_covering_partition(periods: &[Period]) -> Vec<Period> {
    coalesce(periods.iter().flat_map(Period::months))
}

/// `true` if any two periods share a month.
pub fn has_overlapping(periods: &[Period]) -> bool {
    periods.iter().enumerate().any(|(i, a)| {
        periods
            .iter()
            .skip(i + 1)
            .any(|b| a.overlaps(b))
    })
}

/// `true` if the same period appears more than once.
pub fn has_duplicates(periods: &[Period]) -> bool {
    let unique: BTreeSet<&Period> = periods.iter().collect();
    unique.len() != periods.len()
}

/// `true` if the periods are in non-decreasing order.
pub fn is_sorted(periods: &[Period]) -> bool {
    periods.windows(2).all(|w| w[0] <= w[1])
}

/// `true` if the periods together cover one unbroken span.
pub fn is_contiguous(periods: &[Period]) -> bool {
    minimal_covering_partition(periods).len() == 1
}

fn coalesce(months: impl IntoIterator<Item = Month>) -> Vec<Period> {
    let months: BTreeSet<Month> = months.into_iter().collect();
    let mut out: Vec<Period> = Vec::new();
    for month in months {
        match out.last_mut() {
            Some(current) if current.last.succ() == Some(month) => current.last = month,
            _ => out.push(month.to_period()),
        }
    }
    out
}
