//! TOML configuration loading and validation.

use std::path::{Path, PathBuf};

use hedgebook::{CostModel, HedgePolicy};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration. Every section (and every field) has a default,
/// so a missing config file means a fully-defaulted setup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub costs: CostsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

fn default_data_file() -> String {
    "data/hedge_data.json".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Capital assumed when the first observation arrives with no capital set
    #[serde(default = "default_initial_capital")]
    pub default_initial_capital: f64,
    /// Smallest hedge adjustment (in shares) worth trading
    #[serde(default = "default_min_adjustment")]
    pub min_adjustment_shares: f64,
}

fn default_initial_capital() -> f64 {
    100_000.0
}
fn default_min_adjustment() -> f64 {
    0.01
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_initial_capital: default_initial_capital(),
            min_adjustment_shares: default_min_adjustment(),
        }
    }
}

/// Cost parameters applied when starting a fresh session; a saved document
/// carries its own.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CostsConfig {
    #[serde(default)]
    pub fixed_fee: f64,
    #[serde(default)]
    pub percentage_fee: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        if self.storage.data_file.is_empty() {
            return Err(Error::Config("data_file must not be empty".into()));
        }
        if !self.ledger.default_initial_capital.is_finite()
            || self.ledger.default_initial_capital <= 0.0
        {
            return Err(Error::Config(
                "default_initial_capital must be > 0".into(),
            ));
        }
        if !self.ledger.min_adjustment_shares.is_finite() || self.ledger.min_adjustment_shares < 0.0
        {
            return Err(Error::Config("min_adjustment_shares must be >= 0".into()));
        }
        if !self.costs.fixed_fee.is_finite() || self.costs.fixed_fee < 0.0 {
            return Err(Error::Config("fixed_fee must be >= 0".into()));
        }
        if !self.costs.percentage_fee.is_finite()
            || !(0.0..1.0).contains(&self.costs.percentage_fee)
        {
            return Err(Error::Config(
                "percentage_fee must be in [0.0, 1.0)".into(),
            ));
        }
        Ok(())
    }

    /// Full path to the session document.
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_file)
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }

    /// Ledger policy derived from the `[ledger]` section.
    pub fn hedge_policy(&self) -> HedgePolicy {
        HedgePolicy {
            default_initial_capital: self.ledger.default_initial_capital,
            min_adjustment: self.ledger.min_adjustment_shares,
        }
    }

    /// Cost model for fresh sessions, from the `[costs]` section.
    pub fn cost_model(&self) -> CostModel {
        CostModel::new(self.costs.fixed_fee, self.costs.percentage_fee)
    }
}
