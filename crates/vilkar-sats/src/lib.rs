//! # vilkar-sats — Rate Tables
//!
//! Supplies the time-varying figures the assets criterion is evaluated
//! against: the wage-base ("grunnbeløp") history and the per-month asset
//! limits derived from it. Tables can be built in code, derived from the
//! built-in published history, or loaded from a YAML file.
//!
//! Every table lookup is fail-fast: asking for a month the table does not
//! cover is an error, never a silent default.

pub mod asset_limit;
pub mod config;
pub mod error;
pub mod wage_base;

pub use asset_limit::{AssetLimit, AssetLimitSource, AssetLimitTable, Factor};
pub use config::{SatsConfig, RATE_TABLE_ENV};
pub use error::SatsError;
pub use wage_base::{WageBase, WageBaseTable};
