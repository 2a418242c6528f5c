use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::config::RebalanceConfig;
use crate::errors::{Error, Result};
use crate::portfolio::{AssetClass, PortfolioStore, Position};

use super::rebalance_model::{
    check_threshold, AllocationTarget, DriftDecision, RebalanceAction, RebalanceEntry,
    RebalanceTrade,
};

/// Signed drift of a current weight from its target.
pub fn compute_drift(current_weight: Decimal, target_weight: Decimal) -> Decimal {
    current_weight - target_weight
}

/// Classifies one drift against a threshold.
///
/// `Hold` when `|drift| < threshold`, `Sell` when overweight by at least the
/// threshold, `Buy` when underweight by at least the threshold.
pub fn evaluate(
    current_weight: Decimal,
    target_weight: Decimal,
    threshold: Decimal,
    total_value: Decimal,
) -> Result<DriftDecision> {
    check_threshold(threshold)?;
    if target_weight < Decimal::ZERO || target_weight > Decimal::ONE {
        return Err(Error::invalid_input(format!(
            "Target weight must be within [0, 1], got {}",
            target_weight
        )));
    }

    if current_weight.checked_sub(target_weight).is_none() {
        return Err(Error::invalid_input(format!(
            "Current weight {} is out of range",
            current_weight
        )));
    }
    let drift = compute_drift(current_weight, target_weight);
    let drift_abs = drift.abs();

    let action = if drift_abs < threshold || drift.is_zero() {
        RebalanceAction::Hold
    } else if drift > Decimal::ZERO {
        RebalanceAction::Sell
    } else {
        RebalanceAction::Buy
    };

    let drift_amount = drift.checked_mul(total_value).ok_or_else(|| {
        Error::Calculation(format!(
            "Drift {} of a {} portfolio is not representable",
            drift, total_value
        ))
    })?;

    Ok(DriftDecision {
        action,
        drift,
        drift_abs,
        drift_amount,
    })
}

/// Threshold for an asset class, most specific override first: the tightest
/// per-position override among the class's holdings, then the class override,
/// then the target-wide override, then the configured default.
pub fn resolve_threshold(
    class: AssetClass,
    positions: &[Position],
    target: &AllocationTarget,
    config: &RebalanceConfig,
) -> Decimal {
    positions
        .iter()
        .filter(|p| p.asset_class == class)
        .filter_map(|p| p.drift_threshold)
        .min()
        .or_else(|| target.class_thresholds.get(&class).copied())
        .or(target.drift_threshold)
        .unwrap_or(config.default_drift_threshold)
}

/// Compares the portfolio's class weights with `target`.
///
/// Returns one entry per asset class that is either held or targeted, ordered
/// by absolute drift, largest first.
pub fn analyze(
    store: &PortfolioStore,
    target: &AllocationTarget,
    config: &RebalanceConfig,
) -> Result<Vec<RebalanceEntry>> {
    target.validate()?;
    check_threshold(config.default_drift_threshold)?;

    let total_value = store.total_value();
    let current = store.weights_by_class();

    let classes: BTreeSet<AssetClass> = current
        .iter()
        .filter(|(_, weight)| !weight.is_zero())
        .map(|(class, _)| *class)
        .chain(target.weights.keys().copied())
        .collect();

    let mut entries = Vec::with_capacity(classes.len());
    for class in classes {
        let current_weight = current.get(&class).copied().unwrap_or(Decimal::ZERO);
        let target_weight = target.weight(class);
        let threshold = resolve_threshold(class, store.positions(), target, config);

        let decision = evaluate(current_weight, target_weight, threshold, total_value)?;
        entries.push(RebalanceEntry {
            asset_class: class,
            current_weight,
            target_weight,
            drift: decision.drift,
            threshold,
            action: decision.action,
            amount: decision.drift_amount,
        });
    }

    entries.sort_by(|a, b| {
        by_magnitude_desc(a.drift, b.drift).then(a.asset_class.cmp(&b.asset_class))
    });

    debug!(
        "Rebalance analysis: {} classes, {} actionable",
        entries.len(),
        entries
            .iter()
            .filter(|e| e.action != RebalanceAction::Hold)
            .count()
    );
    Ok(entries)
}

/// Currency trades that bring every class exactly to its target weight,
/// largest first. Empty when the portfolio has no value.
pub fn rebalance_trades(
    total_value: Decimal,
    current: &BTreeMap<AssetClass, Decimal>,
    target: &AllocationTarget,
) -> Vec<RebalanceTrade> {
    if total_value <= Decimal::ZERO {
        return Vec::new();
    }

    let classes: BTreeSet<AssetClass> = current
        .keys()
        .chain(target.weights.keys())
        .copied()
        .collect();

    let mut trades: Vec<RebalanceTrade> = classes
        .into_iter()
        .filter_map(|class| {
            let current_weight = current.get(&class).copied().unwrap_or_default();
            let values = total_value.checked_mul(current_weight).and_then(|current_value| {
                let target_value = total_value.checked_mul(target.weight(class))?;
                Some((current_value, target_value, target_value.checked_sub(current_value)?))
            });
            let Some((current_value, target_value, trade_value)) = values else {
                warn!(
                    "Skipping {} trade: weight {} of {} is not representable",
                    class, current_weight, total_value
                );
                return None;
            };

            if trade_value.is_zero() {
                return None;
            }

            let action = if trade_value > Decimal::ZERO {
                RebalanceAction::Buy
            } else {
                RebalanceAction::Sell
            };

            Some(RebalanceTrade {
                asset_class: class,
                action,
                amount: trade_value.abs(),
                current_value,
                target_value,
                trade_value,
            })
        })
        .collect();

    trades.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.asset_class.cmp(&b.asset_class)));
    trades
}

fn by_magnitude_desc(a: Decimal, b: Decimal) -> Ordering {
    b.abs().cmp(&a.abs())
}
