//! Rebalancing domain models.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::WEIGHT_TOLERANCE;
use crate::errors::{Error, Result};
use crate::portfolio::AssetClass;

/// Advisory action for a drifted allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RebalanceAction {
    Hold,
    Buy,
    Sell,
}

/// Outcome of comparing one current weight with its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftDecision {
    pub action: RebalanceAction,
    /// Signed `current - target`
    pub drift: Decimal,
    pub drift_abs: Decimal,
    /// `drift * total portfolio value`: the amount to transact back to target
    pub drift_amount: Decimal,
}

/// Target weight per asset class, with optional drift-threshold overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationTarget {
    pub weights: BTreeMap<AssetClass, Decimal>,
    /// Replaces the configured default threshold for every class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drift_threshold: Option<Decimal>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub class_thresholds: BTreeMap<AssetClass, Decimal>,
}

impl AllocationTarget {
    /// Builds a target whose weights lie in [0, 1] and sum to one.
    pub fn new(weights: BTreeMap<AssetClass, Decimal>) -> Result<Self> {
        let target = Self {
            weights,
            drift_threshold: None,
            class_thresholds: BTreeMap::new(),
        };
        target.validate()?;
        Ok(target)
    }

    pub fn from_pairs(pairs: &[(AssetClass, Decimal)]) -> Result<Self> {
        Self::new(pairs.iter().copied().collect())
    }

    pub fn with_drift_threshold(mut self, threshold: Decimal) -> Result<Self> {
        check_threshold(threshold)?;
        self.drift_threshold = Some(threshold);
        Ok(self)
    }

    pub fn with_class_threshold(mut self, class: AssetClass, threshold: Decimal) -> Result<Self> {
        check_threshold(threshold)?;
        self.class_thresholds.insert(class, threshold);
        Ok(self)
    }

    /// Target weight of a class; zero when the class is not targeted.
    pub fn weight(&self, class: AssetClass) -> Decimal {
        self.weights.get(&class).copied().unwrap_or(Decimal::ZERO)
    }

    /// Checks weight bounds, the unit sum and every threshold.
    pub fn validate(&self) -> Result<()> {
        for (class, weight) in &self.weights {
            if *weight < Decimal::ZERO || *weight > Decimal::ONE {
                return Err(Error::invalid_input(format!(
                    "Target weight for {} must be within [0, 1], got {}",
                    class, weight
                )));
            }
        }

        let total: Decimal = self.weights.values().copied().sum();
        if (total - Decimal::ONE).abs() > WEIGHT_TOLERANCE {
            return Err(Error::invalid_input(format!(
                "Target weights must sum to 1, got {}",
                total
            )));
        }

        if let Some(threshold) = self.drift_threshold {
            check_threshold(threshold)?;
        }
        for threshold in self.class_thresholds.values() {
            check_threshold(*threshold)?;
        }
        Ok(())
    }
}

pub(crate) fn check_threshold(threshold: Decimal) -> Result<()> {
    if threshold < Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "Drift threshold cannot be negative: {}",
            threshold
        )));
    }
    Ok(())
}

/// Drift of one asset class against its target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceEntry {
    pub asset_class: AssetClass,
    pub current_weight: Decimal,
    pub target_weight: Decimal,
    pub drift: Decimal,
    /// Threshold that applied after override resolution
    pub threshold: Decimal,
    pub action: RebalanceAction,
    /// Signed currency amount, `drift * total portfolio value`
    pub amount: Decimal,
}

/// Trade needed to bring one asset class exactly back to target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceTrade {
    pub asset_class: AssetClass,
    pub action: RebalanceAction,
    /// Absolute currency amount to trade
    pub amount: Decimal,
    pub current_value: Decimal,
    pub target_value: Decimal,
    /// Signed `target_value - current_value`
    pub trade_value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyRule {
    SinglePositionLimit,
    CryptoAllocationLimit,
    EmergencyFundPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyStatus {
    Ok,
    Warning,
    Violation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyCheck {
    pub rule: PolicyRule,
    pub status: PolicyStatus,
    /// Ticker the check refers to, for per-position rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Observed weight, when the rule is weight based
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_weight: Option<Decimal>,
    pub detail: String,
}

/// Result of checking the portfolio against its concentration policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyReport {
    pub compliant: bool,
    pub violations: u32,
    pub warnings: u32,
    pub checks: Vec<PolicyCheck>,
}

impl PolicyReport {
    pub fn from_checks(checks: Vec<PolicyCheck>) -> Self {
        let count = |status: PolicyStatus| {
            checks.iter().filter(|c| c.status == status).count() as u32
        };
        let violations = count(PolicyStatus::Violation);
        let warnings = count(PolicyStatus::Warning);

        Self {
            compliant: violations == 0,
            violations,
            warnings,
            checks,
        }
    }
}
