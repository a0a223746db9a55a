//! # Verdict — Three-Valued Assessment Result
//!
//! Verdicts form a small lattice used for pessimistic composition:
//!
//! ```text
//! Ordering (worst → best): Denied < Undetermined < Approved
//!
//! meet(a, b) = min(a, b)    every part must pass
//! ```
//!
//! Folding `meet` over a criterion's periods gives the criterion verdict,
//! and folding it over an aggregate's criteria gives the case verdict:
//! all Approved yields Approved, any Denied yields Denied, anything else
//! is Undetermined.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The result of assessing one criterion for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The criterion is met ("innvilget").
    Approved,
    /// The criterion is not met ("avslag").
    Denied,
    /// Not enough information to decide ("uavklart").
    Undetermined,
}

impl Verdict {
    fn ordering(self) -> u8 {
        match self {
            Self::Denied => 0,
            Self::Undetermined => 1,
            Self::Approved => 2,
        }
    }

    /// Greatest lower bound. `Denied` is absorbing.
    pub fn meet(self, other: Self) -> Self {
        if self.ordering() <= other.ordering() {
            self
        } else {
            other
        }
    }

    /// Meet over any number of verdicts.
    ///
    /// The empty fold is `Undetermined`: nothing assessed means nothing
    /// approved.
    pub fn meet_all(verdicts: impl IntoIterator<Item = Verdict>) -> Verdict {
        verdicts
            .into_iter()
            .reduce(Verdict::meet)
            .unwrap_or(Verdict::Undetermined)
    }

    pub fn is_approved(self) -> bool {
        self == Self::Approved
    }

    pub fn is_denied(self) -> bool {
        self == Self::Denied
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Denied => "denied",
            Self::Undetermined => "undetermined",
        }
    }
}

impl PartialOrd for Verdict {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Verdict {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ordering().cmp(&other.ordering())
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
