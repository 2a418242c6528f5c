use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::{PhaseConfig, SavingsSplit};
use crate::errors::{Error, Result};
use crate::portfolio::AssetClass;
use crate::rebalance::AllocationTarget;

use super::phase_model::{EmergencyFundState, Phase, PhaseResult, SavingsPlan};

/// Classifies emergency-fund adequacy from the current state alone.
///
/// Coverage at or above `target_months` is [`Phase::Phase2Accumulation`];
/// anything below is [`Phase::Phase1Foundation`].
pub fn detect_phase(state: &EmergencyFundState, config: &PhaseConfig) -> Result<PhaseResult> {
    let coverage_months = state.coverage_months()?;
    let phase = if coverage_months >= Decimal::from(config.target_months) {
        Phase::Phase2Accumulation
    } else {
        Phase::Phase1Foundation
    };
    Ok(result_for(phase, coverage_months, config))
}

/// Like [`detect_phase`], but a portfolio already in Phase 2 stays there
/// until coverage falls below `target_months - hysteresis_months`.
pub fn detect_phase_with_hysteresis(
    state: &EmergencyFundState,
    previous: Phase,
    config: &PhaseConfig,
) -> Result<PhaseResult> {
    let coverage_months = state.coverage_months()?;
    let target = Decimal::from(config.target_months);

    let phase = match previous {
        Phase::Phase2Accumulation if coverage_months >= target - config.hysteresis_months => {
            Phase::Phase2Accumulation
        }
        _ if coverage_months >= target => Phase::Phase2Accumulation,
        _ => Phase::Phase1Foundation,
    };

    if phase != previous {
        debug!(
            "Phase changed from {} to {} at {} months coverage",
            previous, phase, coverage_months
        );
    }
    Ok(result_for(phase, coverage_months, config))
}

/// Splits `monthly_savings` between the emergency fund and investments.
pub fn savings_split(
    phase: Phase,
    monthly_savings: Decimal,
    config: &PhaseConfig,
) -> Result<SavingsPlan> {
    if monthly_savings < Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "Monthly savings cannot be negative, got {}",
            monthly_savings
        )));
    }

    let split = split_for(phase, config);
    let ef_amount = monthly_savings * split.ef_share;
    Ok(SavingsPlan {
        phase,
        ef_amount,
        invest_amount: monthly_savings - ef_amount,
    })
}

/// Recommended asset-class allocation for a phase.
pub fn phase_allocation_target(phase: Phase) -> AllocationTarget {
    let weights = match phase {
        Phase::Phase1Foundation => vec![
            (AssetClass::MoneyMarket, dec!(0.80)),
            (AssetClass::EquityDomestic, dec!(0.10)),
            (AssetClass::Crypto, dec!(0.10)),
        ],
        Phase::Phase2Accumulation => vec![
            (AssetClass::MoneyMarket, dec!(0.20)),
            (AssetClass::EquityDomestic, dec!(0.30)),
            (AssetClass::EquityForeign, dec!(0.30)),
            (AssetClass::Crypto, dec!(0.20)),
        ],
    };

    AllocationTarget {
        weights: weights.into_iter().collect(),
        ..AllocationTarget::default()
    }
}

fn split_for(phase: Phase, config: &PhaseConfig) -> SavingsSplit {
    match phase {
        Phase::Phase1Foundation => config.phase1_split,
        Phase::Phase2Accumulation => config.phase2_split,
    }
}

fn result_for(phase: Phase, coverage_months: Decimal, config: &PhaseConfig) -> PhaseResult {
    let split = split_for(phase, config);
    PhaseResult {
        phase,
        ef_share: split.ef_share,
        invest_share: split.invest_share,
        coverage_months,
    }
}
