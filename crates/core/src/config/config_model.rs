//! Analytics configuration.
//!
//! Every calculator receives the section it needs by reference, so tests and
//! callers can vary rates, caps and thresholds without shared global state.

use std::path::Path;

use log::info;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DRIFT_THRESHOLD, DEFAULT_HARD_CAP_FRACTION, DEFAULT_KELLY_DISCOUNT,
    DEFAULT_RISK_FREE_ANNUAL, DEFAULT_TARGET_MONTHS, TRADING_DAYS_PER_YEAR,
};
use crate::errors::{Error, Result};

/// Settings for the return-series risk metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskConfig {
    /// Periods per year used to annualize daily returns (default: 252)
    pub trading_days_per_year: u32,
    /// Annual risk-free rate subtracted by Sharpe and Sortino (default: 0.05)
    pub risk_free_annual: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
            risk_free_annual: DEFAULT_RISK_FREE_ANNUAL,
        }
    }
}

/// Settings for Kelly-based position sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SizingConfig {
    /// Multiplier applied to the raw Kelly fraction (default: 0.5, half-Kelly)
    pub discount_factor: Decimal,
    /// Largest bankroll fraction ever recommended (default: 0.10)
    pub hard_cap_fraction: Decimal,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            discount_factor: DEFAULT_KELLY_DISCOUNT,
            hard_cap_fraction: DEFAULT_HARD_CAP_FRACTION,
        }
    }
}

/// How new savings are split between the emergency fund and investments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSplit {
    pub ef_share: Decimal,
    pub invest_share: Decimal,
}

/// Settings for emergency-fund phase detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhaseConfig {
    /// Coverage months required for the accumulation phase (default: 6)
    pub target_months: u32,
    /// Months of fixed expenses in the fund target (default: 6)
    pub fixed_expense_months: u32,
    /// Months of variable expenses in the fund target (default: 3)
    pub variable_expense_months: u32,
    /// Buffer below the target before a Phase 2 portfolio falls back (default: 0)
    pub hysteresis_months: Decimal,
    pub phase1_split: SavingsSplit,
    pub phase2_split: SavingsSplit,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            target_months: DEFAULT_TARGET_MONTHS,
            fixed_expense_months: 6,
            variable_expense_months: 3,
            hysteresis_months: Decimal::ZERO,
            phase1_split: SavingsSplit {
                ef_share: dec!(0.8),
                invest_share: dec!(0.2),
            },
            phase2_split: SavingsSplit {
                ef_share: Decimal::ZERO,
                invest_share: Decimal::ONE,
            },
        }
    }
}

/// Settings for drift evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RebalanceConfig {
    /// Absolute weight drift that triggers an action (default: 0.05)
    pub default_drift_threshold: Decimal,
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self {
            default_drift_threshold: DEFAULT_DRIFT_THRESHOLD,
        }
    }
}

/// Concentration limits checked against the live portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyLimits {
    /// Largest weight any single position may carry (default: 0.25)
    pub max_single_position_weight: Decimal,
    /// Largest combined weight of crypto holdings (default: 0.20)
    pub max_crypto_weight: Decimal,
}

impl Default for PolicyLimits {
    fn default() -> Self {
        Self {
            max_single_position_weight: dec!(0.25),
            max_crypto_weight: dec!(0.20),
        }
    }
}

/// Aggregated configuration for all calculators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsConfig {
    pub risk: RiskConfig,
    pub sizing: SizingConfig,
    pub phase: PhaseConfig,
    pub rebalance: RebalanceConfig,
    pub policy: PolicyLimits,
}

impl AnalyticsConfig {
    /// Parses and validates a JSON document. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AnalyticsConfig =
            serde_json::from_str(json).map_err(|e| Error::ConfigIO(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a JSON file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(
                "No analytics config at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    /// Rejects values outside the domain each calculator can work with.
    pub fn validate(&self) -> Result<()> {
        if self.risk.trading_days_per_year == 0 {
            return Err(Error::InvalidConfigValue(
                "risk.tradingDaysPerYear must be positive".to_string(),
            ));
        }
        if self.risk.risk_free_annual <= dec!(-1) {
            return Err(Error::InvalidConfigValue(format!(
                "risk.riskFreeAnnual must be greater than -1, got {}",
                self.risk.risk_free_annual
            )));
        }

        check_unit_interval("sizing.discountFactor", self.sizing.discount_factor)?;
        check_unit_interval("sizing.hardCapFraction", self.sizing.hard_cap_fraction)?;

        if self.phase.target_months == 0 {
            return Err(Error::InvalidConfigValue(
                "phase.targetMonths must be positive".to_string(),
            ));
        }
        if self.phase.hysteresis_months < Decimal::ZERO {
            return Err(Error::InvalidConfigValue(
                "phase.hysteresisMonths cannot be negative".to_string(),
            ));
        }
        check_split("phase.phase1Split", &self.phase.phase1_split)?;
        check_split("phase.phase2Split", &self.phase.phase2_split)?;

        if self.rebalance.default_drift_threshold < Decimal::ZERO {
            return Err(Error::InvalidConfigValue(
                "rebalance.defaultDriftThreshold cannot be negative".to_string(),
            ));
        }

        check_unit_interval(
            "policy.maxSinglePositionWeight",
            self.policy.max_single_position_weight,
        )?;
        check_unit_interval("policy.maxCryptoWeight", self.policy.max_crypto_weight)?;

        Ok(())
    }
}

/// Accepts values in (0, 1].
fn check_unit_interval(key: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO || value > Decimal::ONE {
        return Err(Error::InvalidConfigValue(format!(
            "{} must be in (0, 1], got {}",
            key, value
        )));
    }
    Ok(())
}

fn check_split(key: &str, split: &SavingsSplit) -> Result<()> {
    if split.ef_share < Decimal::ZERO || split.invest_share < Decimal::ZERO {
        return Err(Error::InvalidConfigValue(format!(
            "{} shares cannot be negative",
            key
        )));
    }
    if split.ef_share + split.invest_share != Decimal::ONE {
        return Err(Error::InvalidConfigValue(format!(
            "{} shares must sum to 1, got {}",
            key,
            split.ef_share + split.invest_share
        )));
    }
    Ok(())
}
