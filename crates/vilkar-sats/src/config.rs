//! # Rate-Table Configuration
//!
//! Loads the wage-base history and the asset-limit factor from YAML:
//!
//! ```yaml
//! asset_limit_factor:
//!   numerator: 1
//!   denominator: 2
//! wage_base:
//!   - effective_from: "2021-05"
//!     amount: 106399
//!   - effective_from: "2022-05"
//!     amount: 111477
//! ```
//!
//! When no file is given the built-in published history is used with a
//! factor of one half.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vilkar_core::Period;

use crate::asset_limit::{AssetLimitSource, AssetLimitTable, Factor};
use crate::error::SatsError;
use crate::wage_base::{WageBase, WageBaseTable};

/// Environment variable naming a rate-table YAML file.
pub const RATE_TABLE_ENV: &str = "VILKAR_RATE_TABLE";

/// Parsed rate-table configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatsConfig {
    #[serde(default)]
    pub asset_limit_factor: Factor,
    pub wage_base: Vec<WageBase>,
}

impl SatsConfig {
    /// Built-in published wage-base history with the default factor.
    pub fn builtin() -> Result<Self, SatsError> {
        Ok(Self {
            asset_limit_factor: Factor::HALF,
            wage_base: WageBaseTable::builtin()?.entries().to_vec(),
        })
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SatsError> {
        Self::parse(yaml, PathBuf::from("<inline>"))
    }

    /// Read and parse configuration from a YAML file.
    pub fn from_path(path: &Path) -> Result<Self, SatsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SatsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path.to_path_buf())
    }

    /// Load from the file named by [`RATE_TABLE_ENV`], or the built-in
    /// history when the variable is unset.
    pub fn from_env() -> Result<Self, SatsError> {
        match std::env::var_os(RATE_TABLE_ENV) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => Self::builtin(),
        }
    }

    fn parse(yaml: &str, path: PathBuf) -> Result<Self, SatsError> {
        let config: SatsConfig =
            serde_yaml::from_str(yaml).map_err(|source| SatsError::YamlParse { path, source })?;
        // Validate eagerly so a broken file is rejected at load time.
        config.wage_base_table()?;
        if config.asset_limit_factor != Factor::HALF {
            tracing::warn!(
                factor = %config.asset_limit_factor,
                "rate table uses a non-default asset limit factor"
            );
        }
        Ok(config)
    }

    pub fn wage_base_table(&self) -> Result<WageBaseTable, SatsError> {
        WageBaseTable::new(self.wage_base.clone())
    }
}

impl AssetLimitSource for SatsConfig {
    fn asset_limits(&self, period: Period) -> Result<AssetLimitTable, SatsError> {
        AssetLimitTable::from_wage_base(&self.wage_base_table()?, self.asset_limit_factor, period)
    }
}
