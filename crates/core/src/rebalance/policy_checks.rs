use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::config::PolicyLimits;
use crate::portfolio::{weight_of, AssetClass, PortfolioStore};

use super::rebalance_model::{PolicyCheck, PolicyReport, PolicyRule, PolicyStatus};

/// Checks the live portfolio against its concentration limits.
///
/// Produces one violation per ticker above the single-position limit, one
/// crypto-allocation check, and a warning when no money-market holding backs
/// the emergency fund.
pub fn check_policy_limits(store: &PortfolioStore, limits: &PolicyLimits) -> PolicyReport {
    let total = store.total_value();
    let mut checks = Vec::new();

    let mut by_ticker: BTreeMap<&str, Decimal> = BTreeMap::new();
    for position in store.positions() {
        *by_ticker.entry(position.ticker.as_str()).or_default() += position.market_value();
    }

    if total > Decimal::ZERO {
        for (ticker, value) in by_ticker {
            let weight = weight_of(value, total);
            if weight > limits.max_single_position_weight {
                checks.push(PolicyCheck {
                    rule: PolicyRule::SinglePositionLimit,
                    status: PolicyStatus::Violation,
                    subject: Some(ticker.to_string()),
                    observed_weight: Some(weight),
                    detail: format!(
                        "{} at {}% exceeds the {}% single position limit",
                        ticker,
                        as_percent(weight),
                        as_percent(limits.max_single_position_weight)
                    ),
                });
            }
        }
    }

    let crypto_weight = store
        .weights_by_class()
        .get(&AssetClass::Crypto)
        .copied()
        .unwrap_or_default();
    checks.push(PolicyCheck {
        rule: PolicyRule::CryptoAllocationLimit,
        status: if crypto_weight <= limits.max_crypto_weight {
            PolicyStatus::Ok
        } else {
            PolicyStatus::Violation
        },
        subject: None,
        observed_weight: Some(crypto_weight),
        detail: format!(
            "Crypto at {}% (limit {}%)",
            as_percent(crypto_weight),
            as_percent(limits.max_crypto_weight)
        ),
    });

    let has_emergency_fund = store
        .positions()
        .iter()
        .any(|p| p.asset_class == AssetClass::MoneyMarket && p.quantity > Decimal::ZERO);
    checks.push(PolicyCheck {
        rule: PolicyRule::EmergencyFundPresent,
        status: if has_emergency_fund {
            PolicyStatus::Ok
        } else {
            PolicyStatus::Warning
        },
        subject: None,
        observed_weight: None,
        detail: if has_emergency_fund {
            "Money market holdings back the emergency fund".to_string()
        } else {
            "No money market holdings found for the emergency fund".to_string()
        },
    });

    PolicyReport::from_checks(checks)
}

fn as_percent(weight: Decimal) -> Decimal {
    (weight * Decimal::ONE_HUNDRED).round_dp(1)
}
